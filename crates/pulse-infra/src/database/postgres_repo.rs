//! PostgreSQL user and notification repositories.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use pulse_core::domain::{Notification, User};
use pulse_core::error::RepoError;
use pulse_core::ports::{BaseRepository, NotificationRepository, UserRepository};

use super::entity::follow;
use super::entity::notification::{self, Entity as NotificationEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// Keep the first character of the local part so logs stay free of PII.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.len() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let pattern = format!("%{}%", query.to_lowercase());

        let result = UserEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Username))).like(pattern))
            .order_by_asc(user::Column::Username)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError> {
        let edge = follow::ActiveModel {
            follower_id: Set(follower_id),
            followee_id: Set(followee_id),
            created_at: Set(chrono::Utc::now().into()),
        };

        let inserted = follow::Entity::insert(edge)
            .on_conflict(
                OnConflict::columns([follow::Column::FollowerId, follow::Column::FolloweeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(inserted > 0)
    }

    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError> {
        let result = follow::Entity::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FolloweeId.eq(followee_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn followers(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let edges = follow::Entity::find()
            .filter(follow::Column::FolloweeId.eq(user_id))
            .order_by_asc(follow::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(edges.into_iter().map(|e| e.follower_id).collect())
    }

    async fn following(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let edges = follow::Entity::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_asc(follow::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(edges.into_iter().map(|e| e.followee_id).collect())
    }
}

/// PostgreSQL notification repository.
///
/// Rows carry the kind as text, so reads go through a fallible conversion
/// and cannot reuse the generic base repository.
pub struct PostgresNotificationRepository {
    db: DbConn,
}

impl PostgresNotificationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Notification, Uuid> for PostgresNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, RepoError> {
        NotificationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(Notification::try_from)
            .transpose()
    }

    async fn create(&self, entity: Notification) -> Result<Notification, RepoError> {
        let model = notification::ActiveModel::from(entity)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Notification::try_from(model)
    }

    async fn update(&self, entity: Notification) -> Result<Notification, RepoError> {
        let model = notification::ActiveModel::from(entity)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Notification::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = NotificationEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(Notification::try_from)
            .collect()
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), RepoError> {
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("no-at-sign"), "***");
    }
}
