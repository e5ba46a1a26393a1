use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

/// What another user did to trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Share,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Follow => "follow",
            NotificationKind::Share => "share",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(NotificationKind::Like),
            "comment" => Some(NotificationKind::Comment),
            "follow" => Some(NotificationKind::Follow),
            "share" => Some(NotificationKind::Share),
            _ => None,
        }
    }
}

/// Notification entity, addressed to `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_user_id: Uuid,
    pub kind: NotificationKind,
    pub post_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        from_user_id: Uuid,
        kind: NotificationKind,
        post_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            from_user_id,
            kind,
            post_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// A notification with the acting user populated.
#[derive(Debug, Clone)]
pub struct NotificationView {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub from_user: UserSummary,
    pub post_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_its_column_value() {
        for kind in [
            NotificationKind::Like,
            NotificationKind::Comment,
            NotificationKind::Follow,
            NotificationKind::Share,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("poke"), None);
    }
}
