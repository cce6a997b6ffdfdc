//! GraphClient trait — the read-only seam to the twin-graph store
//!
//! The pipeline never talks to the store directly; it goes through this
//! trait so the store can be substituted with a test double. All three
//! operations are reads; the bridge performs no graph mutations.

use super::types::{EntityId, EntitySnapshot, ModelId, Relationship};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from graph store lookups.
///
/// Callers treat every variant as "cannot process this event": the event is
/// dropped and logged, never retried at this layer. Retry belongs to the
/// event source's redelivery mechanism.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("entity not found: {0}")]
    NotFound(EntityId),

    #[error("graph store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed store response: {0}")]
    Decode(String),
}

/// Read-only operations against the twin-graph store.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Fetch the entity's full current property set.
    async fn entity_snapshot(&self, id: &EntityId) -> Result<EntitySnapshot, GraphError>;

    /// Fetch the entity's outgoing relationships, in store order.
    ///
    /// Implementations may page internally; callers see one sequence.
    async fn outgoing_relationships(&self, id: &EntityId)
        -> Result<Vec<Relationship>, GraphError>;

    /// Fetch the entity's model id.
    async fn entity_model(&self, id: &EntityId) -> Result<ModelId, GraphError>;
}
