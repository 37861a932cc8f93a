use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::EventRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedEventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

/// A saved row joined with its event detail, as returned to clients.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedEventDetail {
    #[sqlx(rename = "saved_id")]
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub event: EventRow,
}
