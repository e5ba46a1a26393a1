//! Application state - shared across all handlers.

use std::sync::Arc;

use pulse_core::ports::{
    NotificationRepository, PasswordService, PostRepository, PubSub, TokenService, UserRepository,
};
use pulse_core::services::{NotificationService, PostService, UserService};
use pulse_infra::{
    Argon2PasswordService, InMemoryNotificationRepository, InMemoryPostRepository, InMemoryPubSub,
    InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use pulse_infra::{
    DatabaseConnections, PostgresNotificationRepository, PostgresPostRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub notifications: Arc<NotificationService>,
    pub pubsub: Arc<dyn PubSub>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

/// The three repositories the services are built on.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(
                connections.main.clone(),
            )),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Self::repositories(config).await;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let state = Self::from_parts(
            repos,
            Arc::new(InMemoryPubSub::default()),
            tokens,
            Arc::new(Argon2PasswordService::new()),
        );

        tracing::info!("Application state initialized");
        state
    }

    /// Wire the services over the given adapters.
    pub fn from_parts(
        repos: Repositories,
        pubsub: Arc<dyn PubSub>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let notifications = Arc::new(NotificationService::new(
            repos.notifications,
            repos.users.clone(),
            pubsub.clone(),
        ));

        let posts = Arc::new(PostService::new(
            repos.posts,
            repos.users.clone(),
            notifications.clone(),
            pubsub.clone(),
        ));

        let users = Arc::new(UserService::new(repos.users.clone(), notifications.clone()));

        Self {
            user_repo: repos.users,
            users,
            posts,
            notifications,
            pubsub,
            tokens,
            passwords,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => Repositories::postgres(&connections),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Repositories::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Repositories::in_memory()
    }
}
