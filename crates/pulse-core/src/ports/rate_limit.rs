//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Per-client request throttle.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request against `client_key` and report whether it may proceed.
    async fn check(&self, client_key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Configured burst size, reported to clients as `X-RateLimit-Limit`.
    pub limit: u32,
    /// Time until the client may retry. Zero when allowed.
    pub retry_after: Duration,
}

impl RateLimitResult {
    pub fn allowed(limit: u32) -> Self {
        Self {
            allowed: true,
            limit,
            retry_after: Duration::ZERO,
        }
    }

    pub fn denied(limit: u32, retry_after: Duration) -> Self {
        Self {
            allowed: false,
            limit,
            retry_after,
        }
    }
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
