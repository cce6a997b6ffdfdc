//! EventPublisher trait — the outbound seam to the realtime channel
//!
//! The channel receives one message per normalized event, addressed to a
//! fixed logical target, with the JSON payload as the single string
//! argument. Delivery and fan-out are the channel's responsibility.

use async_trait::async_trait;
use thiserror::Error;

/// Logical target name subscribers listen on.
pub const UPDATE_TARGET: &str = "digitalTwinUpdate";

/// Errors from the publish channel.
///
/// Unlike classification and store failures, these surface to the caller:
/// the event source's redelivery policy owns the retry.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish channel rejected the message: {0}")]
    Rejected(String),

    #[error("publish channel unavailable: {0}")]
    Unavailable(String),
}

/// Accepts normalized payloads for delivery to subscribers.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver one serialized payload to the given logical target.
    async fn publish(&self, target: &str, payload: &str) -> Result<(), PublishError>;
}

/// Publisher that writes payloads to stdout, one per line.
///
/// Used by the CLI; also a convenient tap when wiring a real channel.
pub struct StdoutPublisher;

#[async_trait]
impl EventPublisher for StdoutPublisher {
    async fn publish(&self, _target: &str, payload: &str) -> Result<(), PublishError> {
        println!("{}", payload);
        Ok(())
    }
}
