//! Notification entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use pulse_core::domain::NotificationKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    pub from_user_id: Uuid,
    /// One of `like`, `comment`, `follow`, `share`.
    pub kind: String,
    #[sea_orm(nullable)]
    pub post_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FromUserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    FromUser,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for pulse_core::domain::Notification {
    type Error = pulse_core::RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&model.kind).ok_or_else(|| {
            pulse_core::RepoError::Query(format!("unknown notification kind '{}'", model.kind))
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            from_user_id: model.from_user_id,
            kind,
            post_id: model.post_id,
            read: model.read,
            created_at: model.created_at.into(),
        })
    }
}

impl From<pulse_core::domain::Notification> for ActiveModel {
    fn from(notification: pulse_core::domain::Notification) -> Self {
        Self {
            id: Set(notification.id),
            user_id: Set(notification.user_id),
            from_user_id: Set(notification.from_user_id),
            kind: Set(notification.kind.as_str().to_string()),
            post_id: Set(notification.post_id),
            read: Set(notification.read),
            created_at: Set(notification.created_at.into()),
        }
    }
}
