//! Service behaviour over the in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use uuid::Uuid;

use pulse_core::DomainError;
use pulse_core::domain::{NewPost, NotificationKind, PostEdit, ProfileUpdate, User};
use pulse_core::ports::{BaseRepository, PubSub};
use pulse_core::services::realtime::{notifications_channel, post_likes_channel};
use pulse_core::services::{NotificationService, PostService, UserService};
use pulse_infra::{
    InMemoryNotificationRepository, InMemoryPostRepository, InMemoryPubSub, InMemoryUserRepository,
};

struct Harness {
    users_repo: Arc<InMemoryUserRepository>,
    pubsub: Arc<InMemoryPubSub>,
    posts: PostService,
    users: UserService,
    notifications: Arc<NotificationService>,
}

impl Harness {
    fn new() -> Self {
        let users_repo = Arc::new(InMemoryUserRepository::new());
        let pubsub = Arc::new(InMemoryPubSub::default());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(InMemoryNotificationRepository::new()),
            users_repo.clone(),
            pubsub.clone(),
        ));

        Self {
            posts: PostService::new(
                Arc::new(InMemoryPostRepository::new()),
                users_repo.clone(),
                notifications.clone(),
                pubsub.clone(),
            ),
            users: UserService::new(users_repo.clone(), notifications.clone()),
            users_repo,
            pubsub,
            notifications,
        }
    }

    async fn user(&self, name: &str) -> User {
        self.users_repo
            .create(User::new(
                name.to_string(),
                format!("{name}@example.com"),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn post(&self, author: &User, content: &str) -> Uuid {
        self.posts
            .create(
                author.id,
                NewPost {
                    content: content.to_string(),
                    image: None,
                },
            )
            .await
            .unwrap()
            .id
    }
}

#[tokio::test]
async fn feed_pages_hold_ten_posts() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    for i in 0..25 {
        h.post(&alice, &format!("post {i}")).await;
    }

    let first = h.posts.feed(None).await.unwrap();
    assert_eq!(first.page, 1);
    assert_eq!(first.pages, 3);
    assert_eq!(first.items.len(), 10);
    assert!(first.has_more);

    let last = h.posts.feed(Some(3)).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.has_more);

    assert!(h.posts.feed(Some(4)).await.unwrap().items.is_empty());
    assert_eq!(h.posts.feed(Some(0)).await.unwrap().page, 1);
}

#[tokio::test]
async fn feed_is_newest_first_and_populated() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    h.post(&alice, "older").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    h.post(&alice, "newer").await;

    let feed = h.posts.feed(Some(1)).await.unwrap();
    assert_eq!(feed.items[0].content, "newer");
    assert_eq!(feed.items[0].author.username, "alice");
}

#[tokio::test]
async fn like_twice_restores_original_state() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let post_id = h.post(&alice, "hello").await;

    let liked = h.posts.toggle_like(bob.id, post_id).await.unwrap();
    assert_eq!(liked.likes.len(), 1);
    assert_eq!(liked.likes[0].user.username, "bob");

    let unliked = h.posts.toggle_like(bob.id, post_id).await.unwrap();
    assert!(unliked.likes.is_empty());
}

#[tokio::test]
async fn concurrent_likes_from_distinct_users_are_all_kept() {
    let h = Arc::new(Harness::new());
    let alice = h.user("alice").await;
    let post_id = h.post(&alice, "popular").await;

    let mut likers = Vec::new();
    for i in 0..10 {
        likers.push(h.user(&format!("fan{i}")).await);
    }

    let handles: Vec<_> = likers
        .into_iter()
        .map(|fan| {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.posts.toggle_like(fan.id, post_id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(h.posts.get(post_id).await.unwrap().likes.len(), 10);
}

#[tokio::test]
async fn only_the_author_may_edit_or_delete() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let mallory = h.user("mallory").await;
    let post_id = h.post(&alice, "mine").await;

    let edit = PostEdit {
        content: Some("hijacked".to_string()),
        image: None,
    };
    assert!(matches!(
        h.posts.update(mallory.id, post_id, edit).await,
        Err(DomainError::Unauthorized(_))
    ));
    assert!(matches!(
        h.posts.delete(mallory.id, post_id).await,
        Err(DomainError::Unauthorized(_))
    ));

    let edit = PostEdit {
        content: Some("edited".to_string()),
        image: Some(String::new()),
    };
    let updated = h.posts.update(alice.id, post_id, edit).await.unwrap();
    assert_eq!(updated.content, "edited");

    h.posts.delete(alice.id, post_id).await.unwrap();
    assert!(matches!(
        h.posts.get(post_id).await,
        Err(DomainError::NotFound { entity_type: "Post", .. })
    ));
}

#[tokio::test]
async fn comments_can_only_be_removed_by_their_author() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let post_id = h.post(&alice, "discuss").await;

    let view = h
        .posts
        .add_comment(bob.id, post_id, "nice".to_string())
        .await
        .unwrap();
    let comment_id = view.comments[0].id;
    assert_eq!(view.comments[0].user.username, "bob");

    assert!(matches!(
        h.posts.delete_comment(alice.id, post_id, comment_id).await,
        Err(DomainError::Unauthorized(_))
    ));
    assert!(matches!(
        h.posts.delete_comment(bob.id, post_id, Uuid::new_v4()).await,
        Err(DomainError::NotFound { entity_type: "Comment", .. })
    ));

    let view = h
        .posts
        .delete_comment(bob.id, post_id, comment_id)
        .await
        .unwrap();
    assert!(view.comments.is_empty());
}

#[tokio::test]
async fn interactions_on_missing_posts_are_not_found() {
    let h = Harness::new();
    let bob = h.user("bob").await;
    let missing = Uuid::new_v4();

    assert!(matches!(
        h.posts.toggle_like(bob.id, missing).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        h.posts.add_comment(bob.id, missing, "hi".to_string()).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        h.posts.share(bob.id, missing, "twitter".to_string()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn deleted_author_renders_as_unknown() {
    let h = Harness::new();
    let ghost = h.user("ghost").await;
    let post_id = h.post(&ghost, "boo").await;

    h.users_repo.delete(ghost.id).await.unwrap();

    let view = h.posts.get(post_id).await.unwrap();
    assert_eq!(view.author.id, ghost.id);
    assert_eq!(view.author.username, "unknown");
}

#[tokio::test]
async fn interactions_notify_the_author_but_not_self() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let post_id = h.post(&alice, "hello").await;

    h.posts.toggle_like(alice.id, post_id).await.unwrap();
    assert!(h.notifications.list(alice.id).await.unwrap().is_empty());

    h.posts.toggle_like(bob.id, post_id).await.unwrap();
    h.posts
        .add_comment(bob.id, post_id, "hey".to_string())
        .await
        .unwrap();
    let shared = h
        .posts
        .share(bob.id, post_id, "twitter".to_string())
        .await
        .unwrap();
    assert_eq!(shared.shares_count, 1);

    let inbox = h.notifications.list(alice.id).await.unwrap();
    let mut kinds: Vec<_> = inbox.iter().map(|n| n.kind.as_str()).collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["comment", "like", "share"]);
    assert!(inbox.iter().all(|n| n.from_user.username == "bob"));
    assert!(inbox.iter().all(|n| n.post_id == Some(post_id)));

    // Unliking does not notify.
    h.posts.toggle_like(bob.id, post_id).await.unwrap();
    assert_eq!(h.notifications.list(alice.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn notifications_are_marked_read_by_their_recipient_only() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;

    h.users.follow(bob.id, alice.id).await.unwrap();
    let inbox = h.notifications.list(alice.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Follow);
    assert!(!inbox[0].read);

    assert!(matches!(
        h.notifications.mark_read(bob.id, inbox[0].id).await,
        Err(DomainError::Unauthorized(_))
    ));
    assert!(matches!(
        h.notifications.mark_read(alice.id, Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));

    h.notifications.mark_read(alice.id, inbox[0].id).await.unwrap();
    assert!(h.notifications.list(alice.id).await.unwrap()[0].read);
}

#[tokio::test]
async fn follow_rules() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;

    assert!(matches!(
        h.users.follow(alice.id, alice.id).await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        h.users.follow(alice.id, Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        h.users.unfollow(alice.id, bob.id).await,
        Err(DomainError::Validation(_))
    ));

    h.users.follow(alice.id, bob.id).await.unwrap();
    assert!(matches!(
        h.users.follow(alice.id, bob.id).await,
        Err(DomainError::Validation(_))
    ));

    let profile = h.users.profile(bob.id).await.unwrap();
    assert_eq!(profile.followers.len(), 1);
    assert_eq!(profile.followers[0].username, "alice");
    assert!(profile.following.is_empty());

    let alice_profile = h.users.profile(alice.id).await.unwrap();
    assert_eq!(alice_profile.following[0].username, "bob");

    h.users.unfollow(alice.id, bob.id).await.unwrap();
    assert!(h.users.profile(bob.id).await.unwrap().followers.is_empty());
}

#[tokio::test]
async fn profile_update_rejects_taken_username() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    h.user("bob").await;

    let taken = ProfileUpdate {
        username: Some("bob".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        h.users.update_profile(alice.id, taken).await,
        Err(DomainError::Duplicate(_))
    ));

    let update = ProfileUpdate {
        bio: Some("hi there".to_string()),
        ..Default::default()
    };
    let updated = h.users.update_profile(alice.id, update).await.unwrap();
    assert_eq!(updated.username, "alice");
    assert_eq!(updated.bio, "hi there");
}

#[tokio::test]
async fn search_is_bounded_and_rejects_empty_queries() {
    let h = Harness::new();
    for i in 0..12 {
        h.user(&format!("runner{i:02}")).await;
    }
    h.user("walker").await;

    assert_eq!(h.users.search("RUN").await.unwrap().len(), 10);
    assert_eq!(h.users.search("walk").await.unwrap().len(), 1);
    assert!(matches!(
        h.users.search("   ").await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn likes_and_notifications_are_published() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let post_id = h.post(&alice, "live").await;

    let mut likes = h.pubsub.subscribe(&post_likes_channel(post_id)).await.unwrap();
    let mut inbox = h
        .pubsub
        .subscribe(&notifications_channel(alice.id))
        .await
        .unwrap();

    h.posts.toggle_like(bob.id, post_id).await.unwrap();

    let event: serde_json::Value =
        serde_json::from_str(&likes.next().await.unwrap().payload).unwrap();
    assert_eq!(event["liked"], true);
    assert_eq!(event["likesCount"], 1);
    assert_eq!(event["userId"], bob.id.to_string());

    let notification: serde_json::Value =
        serde_json::from_str(&inbox.next().await.unwrap().payload).unwrap();
    assert_eq!(notification["kind"], "like");
    assert_eq!(notification["fromUser"]["username"], "bob");
}

#[tokio::test]
async fn posts_by_author_are_listed_newest_first() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    h.post(&alice, "a1").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    h.post(&bob, "b1").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    h.post(&alice, "a2").await;

    let posts = h.posts.by_author(alice.id).await.unwrap();
    let contents: Vec<_> = posts.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(contents, vec!["a2", "a1"]);

    assert!(h.posts.by_author(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn comments_are_listed_oldest_first() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let post_id = h.post(&alice, "thread").await;

    for text in ["one", "two", "three"] {
        h.posts
            .add_comment(alice.id, post_id, text.to_string())
            .await
            .unwrap();
    }

    let texts: Vec<_> = h
        .posts
        .comments(post_id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}
