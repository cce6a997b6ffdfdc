//! The bridge pipeline: classify → filter → assemble → publish
//!
//! One inbound event is one independent unit of work. Classification
//! failures, filtered models, and store lookup failures drop the event
//! with a diagnostic and return `Ok`; a publish failure is the only error
//! surfaced to the caller, so the event source can apply its redelivery
//! policy.

mod assemble;
mod filter;
mod publish;

#[cfg(test)]
mod integration_tests;

pub use assemble::SnapshotAssembler;
pub use filter::{ModelFilter, EXTERNAL_TWIN_MODEL};
pub use publish::{EventPublisher, PublishError, StdoutPublisher, UPDATE_TARGET};

use crate::event::{ClassifyError, EventClassifier, NormalizedEvent, RawEvent};
use crate::graph::{GraphClient, GraphError, ModelId};
use std::sync::Arc;

/// Why an event was dropped without being published.
#[derive(Debug)]
pub enum DropReason {
    /// The envelope could not be classified (unknown tag, malformed
    /// payload, missing field, or a failed model lookup).
    Unclassifiable(ClassifyError),
    /// The store could not serve the snapshot or relationship data.
    StoreLookupFailed(GraphError),
    /// The assembled event did not serialize.
    Unserializable(serde_json::Error),
}

/// Outcome of handling one inbound event.
#[derive(Debug)]
pub enum Outcome {
    /// The normalized event was handed to the publish channel.
    Published(NormalizedEvent),
    /// The subject is an external-shadow twin; deliberately not re-broadcast.
    Filtered { model: ModelId },
    /// The event could not be processed; nothing was published.
    Dropped(DropReason),
}

/// The event-normalization pipeline.
///
/// All collaborators are constructor-injected so the store and the channel
/// can be substituted with test doubles.
pub struct SnapshotBridge {
    classifier: EventClassifier,
    filter: ModelFilter,
    assembler: SnapshotAssembler,
    publisher: Arc<dyn EventPublisher>,
}

impl SnapshotBridge {
    /// Bridge with the default external-shadow sentinel.
    pub fn new(graph: Arc<dyn GraphClient>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self::with_filter(graph, publisher, ModelFilter::default())
    }

    /// Bridge with a custom model filter.
    pub fn with_filter(
        graph: Arc<dyn GraphClient>,
        publisher: Arc<dyn EventPublisher>,
        filter: ModelFilter,
    ) -> Self {
        Self {
            classifier: EventClassifier::new(graph.clone()),
            assembler: SnapshotAssembler::new(graph, filter.clone()),
            filter,
            publisher,
        }
    }

    /// Process one inbound event end to end.
    ///
    /// Returns `Err` only when the publish channel fails; every other
    /// failure mode resolves to an `Outcome` so the source does not
    /// redeliver events this layer can never process.
    pub async fn handle(&self, raw: &RawEvent) -> Result<Outcome, PublishError> {
        tracing::info!(event_type = %raw.event_type, "received event");

        let classified = match self.classifier.classify(raw).await {
            Ok(classified) => classified,
            Err(e) => {
                tracing::warn!(event_type = %raw.event_type, %e, "dropping unclassifiable event");
                return Ok(Outcome::Dropped(DropReason::Unclassifiable(e)));
            }
        };

        if !self.filter.should_process(&classified.model) {
            tracing::debug!(
                entity = %classified.entity_id,
                model = %classified.model,
                "external twin event filtered"
            );
            return Ok(Outcome::Filtered {
                model: classified.model,
            });
        }

        let normalized = match self
            .assembler
            .assemble(&classified.entity_id, classified.category, raw.time)
            .await
        {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::warn!(entity = %classified.entity_id, %e, "dropping event after store lookup failure");
                return Ok(Outcome::Dropped(DropReason::StoreLookupFailed(e)));
            }
        };

        let payload = match normalized.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(entity = %normalized.entity_id, %e, "dropping unserializable event");
                return Ok(Outcome::Dropped(DropReason::Unserializable(e)));
            }
        };

        self.publisher.publish(UPDATE_TARGET, &payload).await?;
        tracing::info!(
            entity = %normalized.entity_id,
            kind = ?normalized.kind,
            "published normalized event"
        );
        Ok(Outcome::Published(normalized))
    }
}
