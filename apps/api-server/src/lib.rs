//! # Pulse API Server
//!
//! Actix-web application: configuration, shared state, middleware and
//! route handlers. The binary in `main.rs` wires these together.

pub mod config;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use state::AppState;
