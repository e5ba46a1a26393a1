//! Pub/Sub port - fan-out of realtime events to subscribers.

use async_trait::async_trait;
use futures::stream::BoxStream;

/// Message received from a channel.
#[derive(Debug, Clone)]
pub struct PubSubMessage {
    pub channel: String,
    pub payload: String,
}

/// Live feed of messages on one channel. Dropping it unsubscribes.
pub type MessageStream = BoxStream<'static, PubSubMessage>;

/// Pub/Sub trait - abstraction over pub/sub backends.
#[async_trait]
pub trait PubSub: Send + Sync {
    /// Publish a message to a channel. Publishing with no subscribers is not an error.
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError>;

    /// Subscribe to a channel.
    async fn subscribe(&self, channel: &str) -> Result<MessageStream, PubSubError>;
}

/// Pub/Sub errors.
#[derive(Debug, thiserror::Error)]
pub enum PubSubError {
    #[error("Failed to publish: {0}")]
    PublishError(String),

    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),

    #[error("Connection error: {0}")]
    Connection(String),
}
