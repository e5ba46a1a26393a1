//! Seeds a fresh Pulse database with sample users, posts and interactions.
//!
//! Existing rows are wiped first. Requires `DATABASE_URL`.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{DbConn, EntityTrait};

use pulse_core::domain::{NewPost, User};
use pulse_core::ports::{BaseRepository, PasswordService, PubSub, UserRepository};
use pulse_core::services::{NotificationService, PostService, UserService};
use pulse_infra::database::entity;
use pulse_infra::{
    Argon2PasswordService, DatabaseConfig, DatabaseConnections, InMemoryPubSub,
    PostgresNotificationRepository, PostgresPostRepository, PostgresUserRepository,
};

const PASSWORD: &str = "password123";

const USERS: &[(&str, &str, &str)] = &[
    (
        "johndoe",
        "john@example.com",
        "Software developer passionate about technology and innovation.",
    ),
    (
        "janedoe",
        "jane@example.com",
        "Designer and creative thinker. Love creating beautiful user experiences.",
    ),
    (
        "alexsmith",
        "alex@example.com",
        "Entrepreneur and startup enthusiast. Always looking for the next big idea.",
    ),
];

const POSTS: &[(&str, Option<&str>)] = &[
    (
        "Just built my first full-stack application! Feeling excited about backend development.",
        Some("https://images.unsplash.com/photo-1461749280684-dccba630e2f6?w=500"),
    ),
    (
        "Beautiful sunset today! Sometimes you need to step away from the code and enjoy nature.",
        Some("https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=500"),
    ),
    (
        "Working on a new project. The best way to learn is by building something you're passionate about. #coding #webdev",
        None,
    ),
    (
        "Coffee + Code = Perfect Monday morning",
        Some("https://images.unsplash.com/photo-1509042239860-f550ce710b93?w=500"),
    ),
    (
        "Just discovered an amazing new framework. The developer experience is incredible! Anyone else tried it?",
        None,
    ),
];

const COMMENTS: &[&str] = &[
    "Great post!",
    "Love this!",
    "Thanks for sharing!",
    "This is awesome!",
    "Totally agree!",
    "Inspiring!",
];

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    match run().await {
        Ok(()) => {
            tracing::info!("Database seeding completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Seeding failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = DatabaseConfig::from_env().context("DATABASE_URL is not set")?;
    let connections = DatabaseConnections::init(&config)
        .await
        .context("connecting to the database")?;
    let db = connections.main.clone();

    Migrator::up(&db, None).await.context("running migrations")?;
    clear(&db).await?;

    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db.clone()));
    let pubsub: Arc<dyn PubSub> = Arc::new(InMemoryPubSub::default());
    let notifications = Arc::new(NotificationService::new(
        Arc::new(PostgresNotificationRepository::new(db.clone())),
        user_repo.clone(),
        pubsub.clone(),
    ));
    let users = UserService::new(user_repo.clone(), notifications.clone());
    let posts = PostService::new(
        Arc::new(PostgresPostRepository::new(db.clone())),
        user_repo.clone(),
        notifications,
        pubsub,
    );

    let passwords = Argon2PasswordService::new();
    let mut ids = Vec::with_capacity(USERS.len());
    for (username, email, bio) in USERS {
        let hash = passwords.hash(PASSWORD)?;
        let mut user = User::new(username.to_string(), email.to_string(), hash);
        user.bio = bio.to_string();
        let user = user_repo.create(user).await?;
        tracing::info!(username = %user.username, email = %user.email, "Created user");
        ids.push(user.id);
    }

    let mut post_ids = Vec::with_capacity(POSTS.len());
    for (i, (content, image)) in POSTS.iter().enumerate() {
        let author = ids[i % ids.len()];
        let post = posts
            .create(
                author,
                NewPost {
                    content: content.to_string(),
                    image: image.map(str::to_string),
                },
            )
            .await?;
        post_ids.push((post.id, author));
    }
    tracing::info!(count = post_ids.len(), "Created posts");

    // Everyone but the author likes each post; the next user over comments.
    for (i, (post_id, author)) in post_ids.iter().enumerate() {
        for user in ids.iter().filter(|id| *id != author) {
            posts.toggle_like(*user, *post_id).await?;
        }
        let commenter = ids[(i + 1) % ids.len()];
        posts
            .add_comment(commenter, *post_id, COMMENTS[i % COMMENTS.len()].to_string())
            .await?;
    }
    tracing::info!("Added likes and comments");

    for (i, follower) in ids.iter().enumerate() {
        users.follow(*follower, ids[(i + 1) % ids.len()]).await?;
    }
    tracing::info!("Added follows");

    for (username, email, _) in USERS {
        tracing::info!("Login: {} / {} ({})", email, PASSWORD, username);
    }

    Ok(())
}

/// Users cascade to every other table.
async fn clear(db: &DbConn) -> anyhow::Result<()> {
    entity::user::Entity::delete_many()
        .exec(db)
        .await
        .context("clearing existing data")?;
    tracing::info!("Cleared existing data");
    Ok(())
}
