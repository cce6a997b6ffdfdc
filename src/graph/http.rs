//! HTTP implementation of GraphClient against the twin store's REST surface
//!
//! One GET per entity snapshot, one paged GET chain per relationship list.
//! The client-wide request timeout is how the inbound trigger's deadline
//! reaches in-flight store calls: a call past the deadline errors as
//! `Unavailable` and the event is dropped instead of completing unobserved.

use super::client::{GraphClient, GraphError};
use super::types::{EntityId, EntitySnapshot, ModelId, Relationship};
use crate::config::BridgeConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of a relationship listing.
#[derive(Debug, Deserialize)]
struct RelationshipPage {
    #[serde(default)]
    value: Vec<Relationship>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// HTTP client for the twin-graph store.
pub struct HttpGraphClient {
    http: reqwest::Client,
    endpoint: String,
    api_version: String,
}

impl HttpGraphClient {
    /// Create a client against the configured store endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("shadowcast/0.1")
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client should build"),
            endpoint: config.service_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        }
    }

    fn entity_url(&self, id: &EntityId) -> String {
        format!(
            "{}/digitaltwins/{}?api-version={}",
            self.endpoint, id, self.api_version
        )
    }

    fn relationships_url(&self, id: &EntityId) -> String {
        format!(
            "{}/digitaltwins/{}/relationships?api-version={}",
            self.endpoint, id, self.api_version
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        id: &EntityId,
    ) -> Result<T, GraphError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GraphError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(GraphError::NotFound(id.clone())),
            status if !status.is_success() => Err(GraphError::Unavailable(format!(
                "store returned {} for {}",
                status, url
            ))),
            _ => response
                .json::<T>()
                .await
                .map_err(|e| GraphError::Decode(e.to_string())),
        }
    }
}

#[async_trait]
impl GraphClient for HttpGraphClient {
    async fn entity_snapshot(&self, id: &EntityId) -> Result<EntitySnapshot, GraphError> {
        self.get_json(&self.entity_url(id), id).await
    }

    async fn outgoing_relationships(
        &self,
        id: &EntityId,
    ) -> Result<Vec<Relationship>, GraphError> {
        let mut relationships = Vec::new();
        let mut url = self.relationships_url(id);
        loop {
            let page: RelationshipPage = self.get_json(&url, id).await?;
            relationships.extend(page.value);
            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(relationships)
    }

    async fn entity_model(&self, id: &EntityId) -> Result<ModelId, GraphError> {
        let snapshot = self.entity_snapshot(id).await?;
        snapshot
            .model()
            .ok_or_else(|| GraphError::Decode(format!("entity {} has no model metadata", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> HttpGraphClient {
        HttpGraphClient::new(&BridgeConfig::new("https://twins.example/"))
    }

    #[test]
    fn entity_url_strips_trailing_slash() {
        let url = client().entity_url(&EntityId::new("lamp-1"));
        assert_eq!(
            url,
            "https://twins.example/digitaltwins/lamp-1?api-version=2023-10-31"
        );
    }

    #[test]
    fn relationships_url_shape() {
        let url = client().relationships_url(&EntityId::new("lamp-1"));
        assert_eq!(
            url,
            "https://twins.example/digitaltwins/lamp-1/relationships?api-version=2023-10-31"
        );
    }

    #[test]
    fn relationship_page_parses_next_link() {
        let page: RelationshipPage = serde_json::from_value(json!({
            "value": [{"$targetId": "room-7"}],
            "nextLink": "https://twins.example/page2"
        }))
        .unwrap();
        assert_eq!(page.value.len(), 1);
        assert_eq!(page.next_link.as_deref(), Some("https://twins.example/page2"));
    }

    #[test]
    fn relationship_page_last_page_has_no_link() {
        let page: RelationshipPage =
            serde_json::from_value(json!({"value": []})).unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }
}
