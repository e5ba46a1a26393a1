//! Realtime channel names and the events published on them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{NotificationKind, NotificationView, UserSummary};
use crate::ports::PubSub;

/// Channel carrying new notifications for one recipient.
pub fn notifications_channel(user_id: Uuid) -> String {
    format!("notifications:{user_id}")
}

/// Channel carrying like toggles on one post.
pub fn post_likes_channel(post_id: Uuid) -> String {
    format!("post_likes:{post_id}")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeEvent {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub liked: bool,
    pub likes_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub from_user: UserSummary,
    pub post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&NotificationView> for NotificationEvent {
    fn from(view: &NotificationView) -> Self {
        Self {
            id: view.id,
            kind: view.kind,
            from_user: view.from_user.clone(),
            post_id: view.post_id,
            created_at: view.created_at,
        }
    }
}

/// Serialize and publish an event; failures are logged only.
pub(crate) async fn publish_json<T: Serialize>(pubsub: &dyn PubSub, channel: &str, event: &T) {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(channel = %channel, error = %e, "Failed to encode realtime event");
            return;
        }
    };

    if let Err(e) = pubsub.publish(channel, &payload).await {
        tracing::warn!(channel = %channel, error = %e, "Failed to publish realtime event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_embed_the_id() {
        let id = Uuid::nil();
        assert_eq!(
            notifications_channel(id),
            "notifications:00000000-0000-0000-0000-000000000000"
        );
        assert!(post_likes_channel(id).starts_with("post_likes:"));
    }

    #[test]
    fn like_event_uses_camel_case() {
        let event = LikeEvent {
            post_id: Uuid::nil(),
            user_id: Uuid::nil(),
            liked: true,
            likes_count: 3,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["likesCount"], 3);
        assert_eq!(json["liked"], true);
    }
}
