//! Model filter — keeps external-shadow twins out of the broadcast
//!
//! Twins tagged with the external-shadow model mirror entities owned by
//! another system; re-broadcasting them would echo updates back out.

use crate::graph::ModelId;

/// Model identifier of external-shadow twins.
pub const EXTERNAL_TWIN_MODEL: &str = "dtmi:io:github:wodt:ExternalDT;1";

/// Predicate over resolved model ids.
#[derive(Debug, Clone)]
pub struct ModelFilter {
    external_model: ModelId,
}

impl ModelFilter {
    /// Filter with a custom external-shadow sentinel.
    pub fn new(external_model: ModelId) -> Self {
        Self { external_model }
    }

    /// Whether a model marks its entity as an external shadow.
    pub fn is_external(&self, model: &ModelId) -> bool {
        *model == self.external_model
    }

    /// Whether events about entities of this model should be processed.
    pub fn should_process(&self, model: &ModelId) -> bool {
        !self.is_external(model)
    }
}

impl Default for ModelFilter {
    fn default() -> Self {
        Self::new(ModelId::new(EXTERNAL_TWIN_MODEL))
    }
}
