use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NotificationKind, Profile, ProfileUpdate, User};
use crate::error::DomainError;
use crate::ports::UserRepository;

use super::NotificationService;
use super::directory::Directory;

/// Maximum number of users returned by a search.
pub const SEARCH_LIMIT: u64 = 10;

/// Profiles and the follow graph.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, notifications: Arc<NotificationService>) -> Self {
        Self {
            users,
            notifications,
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.list().await?)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<User>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::Validation(
                "Search query must not be empty".to_string(),
            ));
        }

        Ok(self.users.search(query, SEARCH_LIMIT).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// A user with populated followers and following.
    pub async fn profile(&self, id: Uuid) -> Result<Profile, DomainError> {
        let user = self.get(id).await?;
        let followers = self.users.followers(id).await?;
        let following = self.users.following(id).await?;

        let directory = Directory::load(
            self.users.as_ref(),
            followers.iter().chain(following.iter()).copied(),
        )
        .await?;

        Ok(Profile {
            user,
            followers: followers.into_iter().map(|id| directory.get(id)).collect(),
            following: following.into_iter().map(|id| directory.get(id)).collect(),
        })
    }

    pub async fn update_profile(
        &self,
        caller: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.get(caller).await?;

        if let Some(username) = update.username.as_deref() {
            if username != user.username {
                if let Some(other) = self.users.find_by_username(username).await? {
                    if other.id != caller {
                        return Err(DomainError::Duplicate("Username already taken".to_string()));
                    }
                }
            }
        }

        user.apply(update);
        let updated = self.users.update(user).await?;
        tracing::info!(user_id = %caller, "Profile updated");
        Ok(updated)
    }

    pub async fn follow(&self, caller: Uuid, target: Uuid) -> Result<(), DomainError> {
        if caller == target {
            return Err(DomainError::Validation(
                "You cannot follow yourself".to_string(),
            ));
        }
        self.get(target).await?;

        if !self.users.follow(caller, target).await? {
            return Err(DomainError::Validation(
                "You already follow this user".to_string(),
            ));
        }

        tracing::info!(follower = %caller, followee = %target, "User followed");
        self.notifications
            .notify(target, caller, NotificationKind::Follow, None)
            .await;
        Ok(())
    }

    pub async fn unfollow(&self, caller: Uuid, target: Uuid) -> Result<(), DomainError> {
        if caller == target {
            return Err(DomainError::Validation(
                "You cannot unfollow yourself".to_string(),
            ));
        }
        self.get(target).await?;

        if !self.users.unfollow(caller, target).await? {
            return Err(DomainError::Validation(
                "You do not follow this user".to_string(),
            ));
        }

        tracing::info!(follower = %caller, followee = %target, "User unfollowed");
        Ok(())
    }
}
