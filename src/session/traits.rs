//! Transport abstraction for the session loop
//!
//! Lets the executor run against a real WebSocket or an in-memory mock.

use crate::protocol::{InboundFrame, OutboundFrame};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to send frame: {0}")]
    Send(String),
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A message-framed, bidirectional client connection
#[async_trait]
pub trait Connection: Send {
    /// Next application frame; `None` once the client has disconnected
    async fn recv(&mut self) -> Option<InboundFrame>;

    async fn send(&mut self, frame: &OutboundFrame) -> Result<(), ConnectionError>;
}
