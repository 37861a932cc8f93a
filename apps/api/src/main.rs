mod auth;
mod config;
mod db;
mod errors;
mod events;
mod extension;
mod models;
mod repo;
mod routes;
mod saved;
mod search;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::repo::events::PgEventRepository;
use crate::repo::history::PgSearchHistoryRepository;
use crate::repo::saved::PgSavedEventRepository;
use crate::routes::build_router;
use crate::session::RedisSessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Eventscope API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config).await?;

    // Initialize Redis-backed session storage
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions = Arc::new(RedisSessionStore::new(redis));
    info!("Redis session store initialized");

    // Build app state: handlers depend on repository and session-store
    // traits, wired to their Postgres/Redis implementations here.
    let state = AppState {
        events: Arc::new(PgEventRepository::new(pool.clone())),
        saved: Arc::new(PgSavedEventRepository::new(pool.clone())),
        history: Arc::new(PgSearchHistoryRepository::new(pool)),
        sessions,
        config: config.clone(),
    };

    // Build router. CORS stays permissive: the browser extension posts
    // scraped batches cross-origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
