use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::saved::{SavedEventDetail, SavedEventRow};
use crate::repo::SavedEventRepository;

pub struct PgSavedEventRepository {
    pool: PgPool,
}

impl PgSavedEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedEventRepository for PgSavedEventRepository {
    async fn save(&self, user_id: Uuid, event_id: Uuid) -> Result<(SavedEventRow, bool)> {
        // The unique constraint resolves concurrent saves of the same pair;
        // no application-side existence check.
        let result = sqlx::query(
            r#"
            INSERT INTO saved_events (id, user_id, event_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, event_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() > 0;
        if created {
            info!("User {user_id} saved event {event_id}");
        }

        let row: SavedEventRow =
            sqlx::query_as("SELECT * FROM saved_events WHERE user_id = $1 AND event_id = $2")
                .bind(user_id)
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((row, created))
    }

    async fn unsave(&self, user_id: Uuid, event_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM saved_events WHERE user_id = $1 AND event_id = $2")
                .bind(user_id)
                .bind(event_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<SavedEventDetail>> {
        Ok(sqlx::query_as(
            r#"
            SELECT s.id AS saved_id, s.saved_at, e.*
            FROM saved_events s
            JOIN events e ON e.id = s.event_id
            WHERE s.user_id = $1
            ORDER BY s.saved_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
