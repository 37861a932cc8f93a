use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::Platform;
use crate::models::history::SearchHistoryRow;
use crate::repo::SearchHistoryRepository;

pub struct PgSearchHistoryRepository {
    pool: PgPool,
}

impl PgSearchHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchHistoryRepository for PgSearchHistoryRepository {
    async fn record(
        &self,
        user_id: Uuid,
        keywords: &str,
        platform: Platform,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<SearchHistoryRow> {
        // Append-only: rows are never updated or deleted.
        Ok(sqlx::query_as(
            r#"
            INSERT INTO search_history
                (id, user_id, keywords, platform, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(keywords)
        .bind(platform.as_str())
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<SearchHistoryRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM search_history WHERE user_id = $1 ORDER BY searched_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
