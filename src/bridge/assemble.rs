//! Snapshot assembler — builds the full outbound picture of one entity
//!
//! For snapshot-bearing categories this re-fetches the entity's current
//! state rather than patching incrementally: one snapshot fetch, one
//! relationship-list fetch, one model lookup per relationship target.
//! Cost is linear in the entity's fan-out; the store client may page
//! internally but no limit is imposed here.

use super::filter::ModelFilter;
use crate::event::{EventCategory, NormalizedEvent};
use crate::graph::{EntityId, GraphClient, GraphError};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Assembles normalized events, re-fetching entity state from the store.
pub struct SnapshotAssembler {
    graph: Arc<dyn GraphClient>,
    filter: ModelFilter,
}

impl SnapshotAssembler {
    pub fn new(graph: Arc<dyn GraphClient>, filter: ModelFilter) -> Self {
        Self { graph, filter }
    }

    /// Build the normalized event for one classified mutation.
    ///
    /// Deletes carry metadata only; the entity no longer exists to query.
    /// Any store failure aborts the whole event — a partial snapshot is
    /// never returned.
    pub async fn assemble(
        &self,
        entity_id: &EntityId,
        category: EventCategory,
        time: DateTime<Utc>,
    ) -> Result<NormalizedEvent, GraphError> {
        let mut event = NormalizedEvent::bare(entity_id.clone(), category.kind(), time);
        if !category.needs_snapshot() {
            return Ok(event);
        }

        let snapshot = self.graph.entity_snapshot(entity_id).await?.sanitized();

        let mut resolved = Vec::new();
        for relationship in self.graph.outgoing_relationships(entity_id).await? {
            // A record without a target cannot be resolved; omit it.
            let Some(target_id) = relationship.target_id() else {
                continue;
            };
            let mut relationship = relationship.sanitized();

            let target_model = self.graph.entity_model(&target_id).await?;
            let external = self.filter.is_external(&target_model);
            relationship.set_external(external);
            if external {
                // Subscribers cannot dereference a foreign store id; hand
                // them the target's public URI instead.
                let target = self.graph.entity_snapshot(&target_id).await?;
                let uri = target.uri().ok_or_else(|| {
                    GraphError::Decode(format!(
                        "external twin {} has no uri property",
                        target_id
                    ))
                })?;
                relationship.set_target(uri);
            }
            resolved.push(relationship);
        }

        event.properties = Some(snapshot);
        event.relationships = Some(resolved);
        Ok(event)
    }
}
