use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Notification, NotificationKind, NotificationView, UserSummary};
use crate::error::DomainError;
use crate::ports::{NotificationRepository, PubSub, UserRepository};

use super::directory::Directory;
use super::realtime::{NotificationEvent, notifications_channel, publish_json};

/// Stores notifications and pushes them to the recipient's realtime channel.
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
    pubsub: Arc<dyn PubSub>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
        pubsub: Arc<dyn PubSub>,
    ) -> Self {
        Self {
            notifications,
            users,
            pubsub,
        }
    }

    /// Record that `actor` did `kind` to `recipient`.
    ///
    /// Self-inflicted actions are ignored. Storage and publish failures are
    /// logged and never surface to the caller.
    pub async fn notify(
        &self,
        recipient: Uuid,
        actor: Uuid,
        kind: NotificationKind,
        post_id: Option<Uuid>,
    ) {
        if recipient == actor {
            return;
        }

        let notification = Notification::new(recipient, actor, kind, post_id);
        let saved = match self.notifications.create(notification).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(
                    recipient = %recipient,
                    kind = kind.as_str(),
                    error = %e,
                    "Failed to store notification"
                );
                return;
            }
        };

        let from_user = match self.users.find_by_id(actor).await {
            Ok(Some(user)) => user.summary(),
            _ => UserSummary::unknown(actor),
        };

        let view = to_view(saved, from_user);
        publish_json(
            self.pubsub.as_ref(),
            &notifications_channel(recipient),
            &NotificationEvent::from(&view),
        )
        .await;

        tracing::debug!(recipient = %recipient, kind = kind.as_str(), "Notification sent");
    }

    /// The user's notifications, newest first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<NotificationView>, DomainError> {
        let notifications = self.notifications.list_for_user(user_id).await?;
        let directory =
            Directory::load(self.users.as_ref(), notifications.iter().map(|n| n.from_user_id))
                .await?;

        Ok(notifications
            .into_iter()
            .map(|n| {
                let from_user = directory.get(n.from_user_id);
                to_view(n, from_user)
            })
            .collect())
    }

    /// Mark one of the caller's notifications as read.
    pub async fn mark_read(&self, caller: Uuid, id: Uuid) -> Result<(), DomainError> {
        let notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification", id))?;

        if notification.user_id != caller {
            return Err(DomainError::unauthorized(
                "Not authorized to update this notification",
            ));
        }

        if !notification.read {
            self.notifications.mark_read(id).await?;
        }

        Ok(())
    }
}

fn to_view(notification: Notification, from_user: UserSummary) -> NotificationView {
    NotificationView {
        id: notification.id,
        kind: notification.kind,
        from_user,
        post_id: notification.post_id,
        read: notification.read,
        created_at: notification.created_at,
    }
}
