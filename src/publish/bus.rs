//! Message-bus transport contract
//!
//! The publisher depends only on this trait; the Kafka transport and the
//! in-process bus used by the test suite both implement it.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::PublishError;

/// One completed upload, ready for the wire.
///
/// The key is the fully-qualified destination path; the value is the whole
/// payload as base64 text so it survives any transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub key: String,
    pub value: String,
}

impl PublishedMessage {
    /// Builds the message for a finished upload.
    pub fn encode(destination: &str, payload: &[u8]) -> Self {
        Self {
            key: destination.to_string(),
            value: BASE64.encode(payload),
        }
    }
}

/// Transport half of the publisher.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Whether the backend connection is established. Checked before every
    /// dispatch; a bus that is not ready drops the message.
    fn is_ready(&self) -> bool;

    /// Delivers one message to the backend.
    async fn publish(&self, message: PublishedMessage) -> Result<(), PublishError>;
}
