//! Event classifier — category, subject id, and model resolution
//!
//! Classification is the only step allowed to look inside the raw payload.
//! Twin events carry their model inline; relationship events cost one
//! store round-trip to resolve the source entity's model.

use super::category::EventCategory;
use super::raw::{RawEvent, RelationshipPayload, TwinLifecyclePayload, TwinUpdatePayload};
use crate::graph::{EntityId, GraphClient, GraphError, ModelId};
use std::sync::Arc;
use thiserror::Error;

/// Why an event could not be classified.
///
/// Non-fatal to the pipeline: the event is dropped with a diagnostic,
/// nothing is published.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("unrecognized event type: {0}")]
    UnknownEventType(String),

    #[error("malformed event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("event carries no subject entity id")]
    MissingSubject,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A successfully classified event.
#[derive(Debug, Clone)]
pub struct ClassifiedEvent {
    pub category: EventCategory,
    pub entity_id: EntityId,
    pub model: ModelId,
}

/// Classifies raw envelopes into category, subject, and model.
pub struct EventClassifier {
    graph: Arc<dyn GraphClient>,
}

impl EventClassifier {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    /// Classify one raw event.
    ///
    /// Async because relationship events resolve the subject's model
    /// through the graph client.
    pub async fn classify(&self, raw: &RawEvent) -> Result<ClassifiedEvent, ClassifyError> {
        let category = EventCategory::from_tag(&raw.event_type)
            .ok_or_else(|| ClassifyError::UnknownEventType(raw.event_type.clone()))?;

        match category {
            EventCategory::TwinCreate | EventCategory::TwinDelete => {
                let payload: TwinLifecyclePayload = serde_json::from_value(raw.data.clone())?;
                Ok(ClassifiedEvent {
                    category,
                    entity_id: subject_id(raw)?,
                    model: ModelId::new(payload.data.metadata.model),
                })
            }
            EventCategory::TwinUpdate => {
                let payload: TwinUpdatePayload = serde_json::from_value(raw.data.clone())?;
                Ok(ClassifiedEvent {
                    category,
                    entity_id: subject_id(raw)?,
                    model: ModelId::new(payload.data.model_id),
                })
            }
            EventCategory::RelationshipCreate | EventCategory::RelationshipDelete => {
                let payload: RelationshipPayload = serde_json::from_value(raw.data.clone())?;
                let entity_id = EntityId::new(payload.data.source_id);
                let model = self.graph.entity_model(&entity_id).await?;
                Ok(ClassifiedEvent {
                    category,
                    entity_id,
                    model,
                })
            }
        }
    }
}

fn subject_id(raw: &RawEvent) -> Result<EntityId, ClassifyError> {
    raw.subject
        .as_deref()
        .map(EntityId::new)
        .ok_or(ClassifyError::MissingSubject)
}
