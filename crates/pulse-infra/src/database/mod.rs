//! Persistence adapters: PostgreSQL through SeaORM, plus in-memory stores
//! that implement the same repository ports.

mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_post;
#[cfg(feature = "postgres")]
mod postgres_repo;

pub use memory::{InMemoryNotificationRepository, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, DatabaseConnections};
#[cfg(feature = "postgres")]
pub use postgres_base::PostgresBaseRepository;
#[cfg(feature = "postgres")]
pub use postgres_post::PostgresPostRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresNotificationRepository, PostgresUserRepository};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
