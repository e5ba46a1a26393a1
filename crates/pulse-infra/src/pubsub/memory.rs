//! In-memory pub/sub implementation.
//!
//! Works within a single process only: realtime clients must be connected to
//! the same server instance that handled the write.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::{RwLock, broadcast};

use pulse_core::ports::{MessageStream, PubSub, PubSubError, PubSubMessage};

/// In-memory pub/sub over one `broadcast` channel per topic.
pub struct InMemoryPubSub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
    buffer_size: usize,
}

impl InMemoryPubSub {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer_size,
        }
    }

    /// Number of live subscriptions on `channel`.
    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .await
            .get(channel)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for InMemoryPubSub {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl PubSub for InMemoryPubSub {
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError> {
        let abandoned = {
            let channels = self.channels.read().await;
            match channels.get(channel) {
                Some(sender) => {
                    // A send error only means every subscriber is gone.
                    let delivered = sender.send(message.to_string()).unwrap_or(0);
                    tracing::debug!(channel = %channel, delivered, "Message published");
                    delivered == 0
                }
                None => {
                    tracing::debug!(channel = %channel, "No subscribers for channel");
                    false
                }
            }
        };

        if abandoned {
            let mut channels = self.channels.write().await;
            if channels
                .get(channel)
                .is_some_and(|sender| sender.receiver_count() == 0)
            {
                channels.remove(channel);
            }
        }

        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<MessageStream, PubSubError> {
        let receiver = {
            let mut channels = self.channels.write().await;
            // Topics whose last subscriber disconnected may never see another publish.
            channels.retain(|_, sender| sender.receiver_count() > 0);
            channels
                .entry(channel.to_string())
                .or_insert_with(|| broadcast::channel(self.buffer_size).0)
                .subscribe()
        };

        let channel_name = channel.to_string();
        tracing::info!(channel = %channel_name, "Subscribed to channel");

        let stream = futures::stream::unfold(receiver, move |mut receiver| {
            let channel = channel_name.clone();
            async move {
                loop {
                    match receiver.recv().await {
                        Ok(payload) => {
                            return Some((PubSubMessage { channel, payload }, receiver));
                        }
                        Err(broadcast::error::RecvError::Lagged(count)) => {
                            tracing::warn!(
                                channel = %channel,
                                lagged = count,
                                "Subscriber lagged behind"
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!(channel = %channel, "Channel closed");
                            return None;
                        }
                    }
                }
            }
        });

        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_messages() {
        let pubsub = InMemoryPubSub::default();
        let mut stream = pubsub.subscribe("notifications:a").await.unwrap();

        pubsub.publish("notifications:a", "first").await.unwrap();
        pubsub.publish("notifications:b", "elsewhere").await.unwrap();
        pubsub.publish("notifications:a", "second").await.unwrap();

        let first = stream.next().await.unwrap();
        assert_eq!(first.channel, "notifications:a");
        assert_eq!(first.payload, "first");
        assert_eq!(stream.next().await.unwrap().payload, "second");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let pubsub = InMemoryPubSub::default();
        assert!(pubsub.publish("post_likes:x", "{}").await.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_subscription_frees_the_channel() {
        let pubsub = InMemoryPubSub::default();
        let stream = pubsub.subscribe("post_likes:x").await.unwrap();
        assert_eq!(pubsub.subscriber_count("post_likes:x").await, 1);

        drop(stream);
        pubsub.publish("post_likes:x", "{}").await.unwrap();

        assert_eq!(pubsub.subscriber_count("post_likes:x").await, 0);
        assert!(pubsub.channels.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_new_subscription_prunes_abandoned_topics() {
        let pubsub = InMemoryPubSub::default();
        drop(pubsub.subscribe("post_likes:quiet").await.unwrap());

        let _live = pubsub.subscribe("post_likes:busy").await.unwrap();

        let channels = pubsub.channels.read().await;
        assert_eq!(channels.len(), 1);
        assert!(channels.contains_key("post_likes:busy"));
    }
}
