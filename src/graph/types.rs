//! Store-side data model: entity ids, model ids, snapshots, relationships
//!
//! Snapshots and relationships are open-schema JSON maps as returned by the
//! twin store, with a reserved subset of `$`-prefixed bookkeeping keys that
//! must be stripped before the data leaves the bridge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved bookkeeping keys on an entity snapshot.
const SNAPSHOT_RESERVED_KEYS: [&str; 3] = ["$dtId", "$etag", "$metadata"];

/// Reserved bookkeeping keys on a relationship record.
const RELATIONSHIP_RESERVED_KEYS: [&str; 2] = ["$relationshipId", "$etag"];

const METADATA_KEY: &str = "$metadata";
const MODEL_KEY: &str = "$model";
const TARGET_ID_KEY: &str = "$targetId";
const URI_KEY: &str = "uri";

/// Opaque identifier of a graph entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of an entity's schema/model.
///
/// Used only for equality comparison against the external-shadow sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The full current property set of an entity, as returned by the store.
///
/// Open schema: arbitrary property names and JSON values. Constructed fresh
/// per request, never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntitySnapshot(Map<String, Value>);

impl EntitySnapshot {
    /// Model id from the store metadata block, if present.
    pub fn model(&self) -> Option<ModelId> {
        self.0
            .get(METADATA_KEY)?
            .get(MODEL_KEY)?
            .as_str()
            .map(ModelId::new)
    }

    /// The entity's public `uri` attribute, if present.
    ///
    /// External-shadow entities carry this; it replaces the raw target id
    /// when a relationship points outside the local graph.
    pub fn uri(&self) -> Option<&str> {
        self.0.get(URI_KEY)?.as_str()
    }

    /// Drop the reserved bookkeeping keys, leaving only entity properties.
    pub fn sanitized(mut self) -> Self {
        for key in SNAPSHOT_RESERVED_KEYS {
            self.0.remove(key);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One outgoing relationship record, as returned by the store.
///
/// Carries the raw target id under `$targetId` until resolution; once the
/// target is resolved as external, that key holds the target's public URI
/// instead. The substitution is part of the outbound contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationship(Map<String, Value>);

impl Relationship {
    /// Raw target entity id, if the record carries one.
    pub fn target_id(&self) -> Option<EntityId> {
        self.0.get(TARGET_ID_KEY)?.as_str().map(EntityId::new)
    }

    /// Drop the reserved bookkeeping keys.
    pub fn sanitized(mut self) -> Self {
        for key in RELATIONSHIP_RESERVED_KEYS {
            self.0.remove(key);
        }
        self
    }

    /// Mark whether the target resolved to an external-shadow entity.
    pub fn set_external(&mut self, external: bool) {
        self.0.insert("external".to_string(), Value::Bool(external));
    }

    /// Replace the target id with the target's public URI.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.0
            .insert(TARGET_ID_KEY.to_string(), Value::String(target.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}
