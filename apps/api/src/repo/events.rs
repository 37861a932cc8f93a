use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::event::{EventFields, EventRow, Platform};
use crate::repo::EventRepository;

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, fields: &EventFields) -> Result<EventRow> {
        let id = Uuid::new_v4();
        let row: EventRow = sqlx::query_as(
            r#"
            INSERT INTO events
                (id, name, description, event_type, platform, link,
                 start_date, end_date, keywords)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.event_type.as_str())
        .bind(fields.platform.as_str())
        .bind(&fields.link)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(&fields.keywords)
        .fetch_one(&self.pool)
        .await?;

        info!("Created event {id} on {}", fields.platform);
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<EventRow>> {
        Ok(sqlx::query_as("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self) -> Result<Vec<EventRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM events ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update(&self, id: Uuid, fields: &EventFields) -> Result<Option<EventRow>> {
        Ok(sqlx::query_as(
            r#"
            UPDATE events
            SET name = $2, description = $3, event_type = $4, platform = $5,
                link = $6, start_date = $7, end_date = $8, keywords = $9,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.event_type.as_str())
        .bind(fields.platform.as_str())
        .bind(&fields.link)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(&fields.keywords)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(
        &self,
        platform: Platform,
        keywords: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<EventRow>> {
        let pattern = contains_pattern(keywords);
        Ok(sqlx::query_as(
            r#"
            SELECT * FROM events
            WHERE platform = $1
              AND (keywords ILIKE $2 OR name ILIKE $2 OR description ILIKE $2)
              AND start_date >= $3
              AND end_date <= $4
            ORDER BY created_at DESC
            "#,
        )
        .bind(platform.as_str())
        .bind(pattern)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Builds a `%...%` ILIKE pattern, escaping LIKE metacharacters so user
/// keywords match literally.
fn contains_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{escaped}%")
}
