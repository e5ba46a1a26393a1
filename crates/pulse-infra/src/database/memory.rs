//! In-memory repositories.
//!
//! Used when no database is configured and by tests. Each store sits behind a
//! single lock, so every interaction write is atomic with respect to others.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use pulse_core::domain::{Comment, Like, LikeToggle, Notification, Post, Share, User};
use pulse_core::error::RepoError;
use pulse_core::ports::{BaseRepository, NotificationRepository, PostRepository, UserRepository};

#[derive(Default)]
struct UserStore {
    users: HashMap<Uuid, User>,
    /// (follower, followee) edges in creation order.
    follows: Vec<(Uuid, Uuid)>,
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<UserStore>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_registration(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    users
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn create(&self, entity: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store.users.contains_key(&entity.id) {
            return Err(RepoError::Constraint(format!("user {} exists", entity.id)));
        }
        if store
            .users
            .values()
            .any(|u| u.username == entity.username || u.email == entity.email)
        {
            return Err(RepoError::Constraint(
                "username or email already in use".to_string(),
            ));
        }

        store.users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store
            .users
            .values()
            .any(|u| u.id != entity.id && u.username == entity.username)
        {
            return Err(RepoError::Constraint("username already in use".to_string()));
        }

        match store.users.get_mut(&entity.id) {
            Some(existing) => {
                *existing = entity.clone();
                Ok(entity)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;

        store.users.remove(&id).ok_or(RepoError::NotFound)?;
        store.follows.retain(|(a, b)| *a != id && *b != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        let wanted: BTreeSet<&Uuid> = ids.iter().collect();

        Ok(wanted
            .into_iter()
            .filter_map(|id| store.users.get(id).cloned())
            .collect())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(sorted_by_registration(store.users.values().cloned().collect()))
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let needle = query.to_lowercase();
        let store = self.store.read().await;

        let mut matches: Vec<User> = store
            .users
            .values()
            .filter(|u| u.username.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.username.cmp(&b.username));
        matches.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(matches)
    }

    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&follower_id) || !store.users.contains_key(&followee_id) {
            return Err(RepoError::NotFound);
        }
        if store.follows.contains(&(follower_id, followee_id)) {
            return Ok(false);
        }

        store.follows.push((follower_id, followee_id));
        Ok(true)
    }

    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        let before = store.follows.len();

        store
            .follows
            .retain(|edge| *edge != (follower_id, followee_id));

        Ok(store.follows.len() < before)
    }

    async fn followers(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .follows
            .iter()
            .filter(|(_, followee)| *followee == user_id)
            .map(|(follower, _)| *follower)
            .collect())
    }

    async fn following(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .follows
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, followee)| *followee)
            .collect())
    }
}

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
    shares: RwLock<Vec<Share>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded share, in insertion order.
    pub async fn shares(&self) -> Vec<Share> {
        self.shares.read().await.clone()
    }
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    posts
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn create(&self, entity: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        if posts.contains_key(&entity.id) {
            return Err(RepoError::Constraint(format!("post {} exists", entity.id)));
        }

        posts.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let existing = posts.get_mut(&entity.id).ok_or(RepoError::NotFound)?;

        // Only author-editable fields; interactions are owned by their own writes.
        existing.content = entity.content;
        existing.image = entity.image;
        existing.updated_at = entity.updated_at;

        Ok(existing.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_page(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(newest_first(posts.values().cloned().collect())
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(newest_first(
            posts
                .values()
                .filter(|p| p.author_id == author_id)
                .cloned()
                .collect(),
        ))
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(RepoError::NotFound)?;

        if post.is_liked_by(user_id) {
            post.likes.retain(|like| like.user_id != user_id);
            Ok(LikeToggle::Unliked)
        } else {
            post.likes.push(Like::new(user_id));
            Ok(LikeToggle::Liked)
        }
    }

    async fn add_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        posts
            .get_mut(&post_id)
            .ok_or(RepoError::NotFound)?
            .comments
            .push(comment);
        Ok(())
    }

    async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(RepoError::NotFound)?;
        let before = post.comments.len();

        post.comments.retain(|c| c.id != comment_id);
        Ok(post.comments.len() < before)
    }

    async fn record_share(&self, share: Share) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&share.post_id).ok_or(RepoError::NotFound)?;

        post.shares_count += 1;
        self.shares.write().await.push(share);
        Ok(())
    }
}

/// In-memory notification repository.
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Notification, Uuid> for InMemoryNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, RepoError> {
        Ok(self.notifications.read().await.get(&id).cloned())
    }

    async fn create(&self, entity: Notification) -> Result<Notification, RepoError> {
        self.notifications
            .write()
            .await
            .insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Notification) -> Result<Notification, RepoError> {
        let mut notifications = self.notifications.write().await;
        let existing = notifications
            .get_mut(&entity.id)
            .ok_or(RepoError::NotFound)?;

        *existing = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.notifications
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        let notifications = self.notifications.read().await;
        let mut list: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();

        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), RepoError> {
        let mut notifications = self.notifications.write().await;
        notifications.get_mut(&id).ok_or(RepoError::NotFound)?.read = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pulse_core::domain::NotificationKind;

    use super::*;

    fn user(name: &str) -> User {
        User::new(
            name.to_string(),
            format!("{name}@example.com"),
            "hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_user_create_rejects_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("alice")).await.unwrap();

        let mut clash = user("alice");
        clash.email = "other@example.com".to_string();

        assert!(matches!(
            repo.create(clash).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_is_idempotent() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(user("alice")).await.unwrap();
        let b = repo.create(user("bob")).await.unwrap();

        assert!(repo.follow(a.id, b.id).await.unwrap());
        assert!(!repo.follow(a.id, b.id).await.unwrap());
        assert_eq!(repo.followers(b.id).await.unwrap(), vec![a.id]);
        assert_eq!(repo.following(a.id).await.unwrap(), vec![b.id]);

        assert!(repo.unfollow(a.id, b.id).await.unwrap());
        assert!(!repo.unfollow(a.id, b.id).await.unwrap());
        assert!(repo.followers(b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_limited() {
        let repo = InMemoryUserRepository::new();
        for name in ["Alice", "malia", "bob", "alina"] {
            repo.create(user(name)).await.unwrap();
        }

        let found = repo.search("ALI", 10).await.unwrap();
        let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Alice", "alina", "malia"]);

        assert_eq!(repo.search("ali", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_like_toggles_are_not_lost() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let post = repo
            .create(Post::new(Uuid::new_v4(), "hello".to_string(), None))
            .await
            .unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.toggle_like(post.id, Uuid::new_v4()).await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), LikeToggle::Liked);
        }

        let stored = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.likes.len(), 20);
    }

    #[tokio::test]
    async fn test_update_keeps_interactions() {
        let repo = InMemoryPostRepository::new();
        let post = repo
            .create(Post::new(Uuid::new_v4(), "hello".to_string(), None))
            .await
            .unwrap();
        let stale = post.clone();

        repo.toggle_like(post.id, Uuid::new_v4()).await.unwrap();

        let mut edited = stale;
        edited.content = "edited".to_string();
        let updated = repo.update(edited).await.unwrap();

        assert_eq!(updated.content, "edited");
        assert_eq!(updated.likes.len(), 1);
    }

    #[tokio::test]
    async fn test_list_page_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let mut ids = Vec::new();

        for i in 0..3 {
            let mut post = Post::new(author, format!("post {i}"), None);
            post.created_at += chrono::TimeDelta::seconds(i);
            ids.push(repo.create(post).await.unwrap().id);
        }

        let page = repo.list_page(0, 2).await.unwrap();
        assert_eq!(page.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[2], ids[1]]);

        let rest = repo.list_page(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, ids[0]);
    }

    #[tokio::test]
    async fn test_record_share_bumps_counter() {
        let repo = InMemoryPostRepository::new();
        let post = repo
            .create(Post::new(Uuid::new_v4(), "hello".to_string(), None))
            .await
            .unwrap();

        repo.record_share(Share::new(post.id, Uuid::new_v4(), "twitter".to_string()))
            .await
            .unwrap();

        assert_eq!(repo.find_by_id(post.id).await.unwrap().unwrap().shares_count, 1);
        assert_eq!(repo.shares().await.len(), 1);
        assert!(matches!(
            repo.record_share(Share::new(Uuid::new_v4(), Uuid::new_v4(), "x".to_string()))
                .await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_mark_read_unknown_notification() {
        let repo = InMemoryNotificationRepository::new();
        let stored = repo
            .create(Notification::new(
                Uuid::new_v4(),
                Uuid::new_v4(),
                NotificationKind::Follow,
                None,
            ))
            .await
            .unwrap();

        repo.mark_read(stored.id).await.unwrap();
        assert!(repo.find_by_id(stored.id).await.unwrap().unwrap().read);
        assert!(matches!(
            repo.mark_read(Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }
}
