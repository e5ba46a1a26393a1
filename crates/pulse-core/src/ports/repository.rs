use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, LikeToggle, Notification, Post, Share, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository, including the follow graph.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fetch every listed user that exists; unknown IDs are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// All users, oldest registration first.
    async fn list(&self) -> Result<Vec<User>, RepoError>;

    /// Case-insensitive username substring search.
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError>;

    /// Add a follow edge. Returns `false` when it already existed.
    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError>;

    /// Remove a follow edge. Returns `false` when there was none.
    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError>;

    async fn followers(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    async fn following(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}

/// Post repository.
///
/// `find_by_id` and the listing methods return the full aggregate (likes and
/// comments loaded). `update` only writes the author-editable fields.
/// Interaction writes are single atomic operations so concurrent requests
/// cannot lose each other's updates.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Newest-first slice of all posts.
    async fn list_page(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// Every post by `author_id`, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Remove the user's like if present, otherwise add one.
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggle, RepoError>;

    async fn add_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError>;

    /// Returns `false` when the comment did not exist on the post.
    async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, RepoError>;

    /// Store the share and bump the post's share counter.
    async fn record_share(&self, share: Share) -> Result<(), RepoError>;
}

/// Notification repository.
#[async_trait]
pub trait NotificationRepository: BaseRepository<Notification, Uuid> {
    /// Notifications addressed to `user_id`, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError>;

    async fn mark_read(&self, id: Uuid) -> Result<(), RepoError>;
}
