//! Twin-graph store access: data model, client seam, HTTP implementation

mod client;
mod http;
mod types;

pub use client::{GraphClient, GraphError};
pub use http::HttpGraphClient;
pub use types::{EntityId, EntitySnapshot, ModelId, Relationship};
