//! Normalized outbound event payload
//!
//! The uniform shape delivered to subscribers, serialized with the wire
//! field names clients already consume. `properties` and `relationships`
//! are omitted entirely (not null) for categories that carry no snapshot.

use super::category::EventKind;
use crate::graph::{EntityId, EntitySnapshot, Relationship};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized event, ready for the publish channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Subject entity id.
    #[serde(rename = "dtId")]
    pub entity_id: EntityId,
    /// CREATE, DELETE, or UPDATE.
    #[serde(rename = "eventType")]
    pub kind: EventKind,
    /// Timestamp of the source mutation.
    #[serde(rename = "eventDateTime")]
    pub time: DateTime<Utc>,
    /// Sanitized current property set; snapshot-bearing categories only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<EntitySnapshot>,
    /// Resolved outgoing relationships, in store order; snapshot-bearing
    /// categories only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
}

impl NormalizedEvent {
    /// Metadata-only event, no snapshot attached.
    pub fn bare(entity_id: EntityId, kind: EventKind, time: DateTime<Utc>) -> Self {
        Self {
            entity_id,
            kind,
            time,
            properties: None,
            relationships: None,
        }
    }

    /// Serialize to the JSON string handed to the publish channel.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
