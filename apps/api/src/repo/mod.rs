pub mod events;
pub mod history;
pub mod saved;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::event::{EventFields, EventRow, Platform};
use crate::models::history::SearchHistoryRow;
use crate::models::saved::{SavedEventDetail, SavedEventRow};

/// Typed CRUD over the events table plus the one filtered query the search
/// engine needs. Handlers never touch SQL directly.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, fields: &EventFields) -> Result<EventRow>;
    async fn get(&self, id: Uuid) -> Result<Option<EventRow>>;
    async fn list(&self) -> Result<Vec<EventRow>>;
    async fn update(&self, id: Uuid, fields: &EventFields) -> Result<Option<EventRow>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Platform exact match, case-insensitive keyword containment against
    /// keywords/name/description, and the event's dates inside the window.
    async fn search(
        &self,
        platform: Platform,
        keywords: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<EventRow>>;
}

#[async_trait]
pub trait SavedEventRepository: Send + Sync {
    /// Insert-or-return-existing for the (user, event) pair. The boolean is
    /// true when a new row was created. Duplicate suppression relies on the
    /// table's unique constraint, not an application pre-check.
    async fn save(&self, user_id: Uuid, event_id: Uuid) -> Result<(SavedEventRow, bool)>;

    /// Returns false when no saved row existed for the pair.
    async fn unsave(&self, user_id: Uuid, event_id: Uuid) -> Result<bool>;

    /// All saved rows for the user with embedded event detail, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<SavedEventDetail>>;
}

#[async_trait]
pub trait SearchHistoryRepository: Send + Sync {
    async fn record(
        &self,
        user_id: Uuid,
        keywords: &str,
        platform: Platform,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<SearchHistoryRow>;

    async fn list(&self, user_id: Uuid) -> Result<Vec<SearchHistoryRow>>;
}
