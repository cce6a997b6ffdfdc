//! Bridge configuration from the environment
//!
//! One required setting: the twin-graph store's service endpoint. Absence
//! is fatal at startup, never per-event.

use thiserror::Error;

/// Environment variable holding the graph store endpoint URL.
pub const SERVICE_URL_VAR: &str = "ADT_SERVICE_URL";
/// Environment variable overriding the store API version.
pub const API_VERSION_VAR: &str = "ADT_API_VERSION";

const DEFAULT_API_VERSION: &str = "2023-10-31";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the {SERVICE_URL_VAR} environment variable is required")]
    MissingServiceUrl,
}

/// Configuration for the bridge process.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the twin-graph store.
    pub service_url: String,
    /// API version sent with every store request.
    pub api_version: String,
}

impl BridgeConfig {
    /// Configuration with the default API version.
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = lookup(SERVICE_URL_VAR)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingServiceUrl)?;
        let api_version =
            lookup(API_VERSION_VAR).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        Ok(Self {
            service_url,
            api_version,
        })
    }
}
