use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    /// Frontend page the browser extension is redirected to after an ingest.
    pub frontend_results_url: String,
    pub db_pool_size: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            frontend_results_url: std::env::var("FRONTEND_RESULTS_URL")
                .unwrap_or_else(|_| "http://localhost:5173/results".to_string()),
            db_pool_size: parse_or_default(std::env::var("DATABASE_POOL_SIZE").ok(), 10)
                .context("DATABASE_POOL_SIZE must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or_default(value: Option<String>, default: u32) -> Result<u32> {
    match value {
        Some(raw) => Ok(raw.parse::<u32>()?),
        None => Ok(default),
    }
}
