//! # Pulse Core
//!
//! The domain layer of the Pulse social network.
//! Entities, the ports infrastructure must implement, and the services that
//! drive posts, profiles and notifications. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
