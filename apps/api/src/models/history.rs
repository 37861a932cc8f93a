use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One logged search. Append-only; anonymous searches are never recorded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchHistoryRow {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Option<Uuid>,
    pub keywords: String,
    pub platform: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub searched_at: DateTime<Utc>,
}
