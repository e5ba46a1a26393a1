//! # Pulse API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::handlers;
use api_server::middleware::rate_limit::RateLimitMiddleware;
use api_server::observability::RequestIdMiddleware;
use api_server::telemetry::{TelemetryConfig, init_telemetry};
use api_server::{AppConfig, AppState};
use pulse_core::ports::RateLimiter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Pulse API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let limiter = rate_limiter(&config);

    HttpServer::new(move || {
        App::new()
            .wrap(RateLimitMiddleware::new(limiter.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(feature = "rate-limit")]
fn rate_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    use pulse_infra::InMemoryRateLimiter;

    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Rate limiting enabled"
    );
    Some(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())))
}

#[cfg(not(feature = "rate-limit"))]
fn rate_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    None
}
