use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;

/// Creates the connection pool for the event store. Pool size comes from
/// `DATABASE_POOL_SIZE` via [`Config`].
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    info!(
        "Event store: connecting to PostgreSQL (pool size {})",
        config.db_pool_size
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.db_pool_size)
        .connect(&config.database_url)
        .await?;

    info!("Event store connection pool ready");
    Ok(pool)
}
