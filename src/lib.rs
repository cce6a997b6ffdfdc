//! Shadowcast: Twin-Graph Snapshot Event Bridge
//!
//! Receives change notifications about entities in a twin-graph store,
//! normalizes them into full entity snapshots, and forwards them to a
//! realtime publish channel for connected viewers.
//!
//! # Core Concepts
//!
//! - **Classification**: each raw envelope resolves to a category, a
//!   subject entity, and that entity's model.
//! - **Filtering**: events about external-shadow twins (mirrored from
//!   other systems) are never re-broadcast.
//! - **Snapshot assembly**: snapshot-bearing categories re-fetch the
//!   entity's current properties and outgoing relationships, sanitized of
//!   store bookkeeping.
//!
//! # Example
//!
//! ```no_run
//! use shadowcast::{BridgeConfig, HttpGraphClient, SnapshotBridge, StdoutPublisher};
//! use std::sync::Arc;
//!
//! let config = BridgeConfig::from_env().expect("ADT_SERVICE_URL must be set");
//! let graph = Arc::new(HttpGraphClient::new(&config));
//! let bridge = SnapshotBridge::new(graph, Arc::new(StdoutPublisher));
//! // bridge.handle(&raw_event).await drives one event through the pipeline
//! ```

pub mod bridge;
pub mod config;
pub mod event;
pub mod graph;

pub use bridge::{
    DropReason, EventPublisher, ModelFilter, Outcome, PublishError, SnapshotAssembler,
    SnapshotBridge, StdoutPublisher, EXTERNAL_TWIN_MODEL, UPDATE_TARGET,
};
pub use config::{BridgeConfig, ConfigError};
pub use event::{
    ClassifiedEvent, ClassifyError, EventCategory, EventClassifier, EventKind, NormalizedEvent,
    RawEvent,
};
pub use graph::{
    EntityId, EntitySnapshot, GraphClient, GraphError, HttpGraphClient, ModelId, Relationship,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
