//! Application configuration loaded from environment variables.

use std::env;

use pulse_infra::JwtConfig;

#[cfg(feature = "postgres")]
use pulse_infra::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use pulse_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` when `DATABASE_URL` is unset; the server then runs on in-memory stores.
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}
