//! Inbound event envelope and per-category payload types
//!
//! The envelope arrives CloudEvent-shaped: a type tag, an optional subject,
//! a timestamp, and an untyped data payload. The payload is validated once,
//! at the classifier boundary, into the discriminated type for its category
//! family, so a missing field is a typed parse error rather than a
//! null-propagating chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw inbound event envelope.
///
/// Immutable; arrives once per invocation. The source owns its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event type tag, matched against the category table.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Subject entity id, when the source sets one.
    #[serde(default)]
    pub subject: Option<String>,
    /// When the mutation occurred at the source.
    pub time: DateTime<Utc>,
    /// Untyped payload; shape depends on `event_type`.
    pub data: Value,
}

/// Payload of a twin create/delete event: the twin's state at mutation
/// time, wrapped in a `data` block. Only the model is read here.
#[derive(Debug, Deserialize)]
pub struct TwinLifecyclePayload {
    pub data: TwinLifecycleData,
}

#[derive(Debug, Deserialize)]
pub struct TwinLifecycleData {
    #[serde(rename = "$metadata")]
    pub metadata: TwinMetadata,
}

#[derive(Debug, Deserialize)]
pub struct TwinMetadata {
    #[serde(rename = "$model")]
    pub model: String,
}

/// Payload of a twin update event: a patch document plus the model id.
#[derive(Debug, Deserialize)]
pub struct TwinUpdatePayload {
    pub data: TwinUpdateData,
}

#[derive(Debug, Deserialize)]
pub struct TwinUpdateData {
    #[serde(rename = "modelId")]
    pub model_id: String,
}

/// Payload of a relationship create/delete event. The subject entity is
/// the relationship's source; the model is not embedded and must be
/// fetched from the store.
#[derive(Debug, Deserialize)]
pub struct RelationshipPayload {
    pub data: RelationshipData,
}

#[derive(Debug, Deserialize)]
pub struct RelationshipData {
    #[serde(rename = "$sourceId")]
    pub source_id: String,
}
