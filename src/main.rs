mod api;
mod app;
mod auth;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod pricing;
mod routes;
mod services;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;

use services::{EventBus, RedisCache};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting PaintQuote backend"
    );

    // Create database pool and apply migrations
    let pool = db::create_pool(&settings).await?;
    db::run_migrations(&pool).await?;

    // Create Redis cache
    let cache = RedisCache::new(&settings.redis_url, settings.redis_cache_ttl_seconds).await?;
    tracing::info!("Redis cache initialized");

    // Create the quote event bus and spawn the notification recorder
    let events = EventBus::new(settings.event_bus_capacity);
    tokio::spawn({
        let mut rx = events.subscribe();
        let pool = pool.clone();
        async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Err(e) = services::notifications::record_quote_event(&pool, &event).await {
                            tracing::warn!(error = %e, "Failed to record quote event");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Notification recorder lagged behind the event bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    });

    // Create JWKS cache for JWT verification
    let jwks_cache = auth::JwksCache::new(
        settings.auth_jwks_url.clone(),
        settings.auth_issuer.clone(),
        settings.auth_audience.clone(),
        settings.jwks_cache_ttl_seconds,
    );

    // Optionally warm the JWKS cache
    if let Err(e) = jwks_cache.warm_cache().await {
        tracing::warn!(error = %e, "Failed to warm JWKS cache - will fetch on first request");
    }

    // Create application state
    let state = app::AppState::new(pool, settings.clone(), jwks_cache, cache, events);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
