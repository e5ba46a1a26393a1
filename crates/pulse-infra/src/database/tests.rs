use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use pulse_core::domain::{LikeToggle, Post};
use pulse_core::error::RepoError;
use pulse_core::ports::{BaseRepository, NotificationRepository, PostRepository};

use super::entity::{notification, post, post_comment, post_like};
use super::{PostgresNotificationRepository, PostgresPostRepository};

fn post_model(id: Uuid, author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        content: "Content".to_owned(),
        image: String::new(),
        shares_count: 2,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

#[tokio::test]
async fn test_find_post_by_id_loads_interactions() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let liker = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, author_id)]])
        .append_query_results([vec![post_like::Model {
            post_id,
            user_id: liker,
            created_at: now.into(),
        }]])
        .append_query_results([vec![post_comment::Model {
            id: Uuid::new_v4(),
            post_id,
            user_id: author_id,
            text: "first".to_owned(),
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.shares_count, 2);
    assert!(post.is_liked_by(liker));
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].text, "first");
}

#[tokio::test]
async fn test_find_missing_post_skips_hydration() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_toggle_like_inserts_when_absent() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, Uuid::new_v4())]])
        .append_exec_results([exec(0), exec(1)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let outcome = repo.toggle_like(post_id, Uuid::new_v4()).await.unwrap();
    assert_eq!(outcome, LikeToggle::Liked);
}

#[tokio::test]
async fn test_toggle_like_removes_when_present() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, Uuid::new_v4())]])
        .append_exec_results([exec(1)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let outcome = repo.toggle_like(post_id, Uuid::new_v4()).await.unwrap();
    assert_eq!(outcome, LikeToggle::Unliked);
}

#[tokio::test]
async fn test_toggle_like_losing_insert_race_unlikes() {
    let post_id = Uuid::new_v4();

    // Nothing to delete, the insert hits the key a concurrent toggle just
    // committed, so the like it left behind is removed instead.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, Uuid::new_v4())]])
        .append_exec_results([exec(0), exec(0), exec(1)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let outcome = repo.toggle_like(post_id, Uuid::new_v4()).await.unwrap();
    assert_eq!(outcome, LikeToggle::Unliked);
}

#[tokio::test]
async fn test_toggle_like_on_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(matches!(
        repo.toggle_like(Uuid::new_v4(), Uuid::new_v4()).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_count_posts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![std::collections::BTreeMap::from([(
            "num_items",
            sea_orm::Value::BigInt(Some(23)),
        )])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.count().await.unwrap(), 23);
}

#[tokio::test]
async fn test_list_notifications_rejects_unknown_kind() {
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![notification::Model {
            id: Uuid::new_v4(),
            user_id,
            from_user_id: Uuid::new_v4(),
            kind: "poke".to_owned(),
            post_id: None,
            read: false,
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresNotificationRepository::new(db);

    assert!(matches!(
        repo.list_for_user(user_id).await,
        Err(RepoError::Query(_))
    ));
}

#[tokio::test]
async fn test_mark_read_missing_notification() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(0)])
        .into_connection();

    let repo = PostgresNotificationRepository::new(db);

    assert!(matches!(
        repo.mark_read(Uuid::new_v4()).await,
        Err(RepoError::NotFound)
    ));
}
