use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::auth::SessionId;
use crate::errors::AppError;
use crate::extension::normalize::{normalize_payload, StoredBatch};
use crate::session::SessionStore;
use crate::state::AppState;

/// Session field holding the latest extension batch.
const EXTENSION_FIELD: &str = "extension_results";

pub async fn store_batch(
    sessions: &dyn SessionStore,
    session: &str,
    batch: &StoredBatch,
) -> anyhow::Result<()> {
    let serialized = serde_json::to_string(batch)?;
    sessions.put(session, EXTENSION_FIELD, &serialized).await
}

pub async fn load_batch(
    sessions: &dyn SessionStore,
    session: &str,
) -> anyhow::Result<Option<StoredBatch>> {
    match sessions.get(session, EXTENSION_FIELD).await? {
        Some(serialized) => Ok(Some(serde_json::from_str(&serialized)?)),
        None => Ok(None),
    }
}

/// POST /api/events/results
/// Unauthenticated by design: the browser extension has no session login.
/// Failures are reported back with the raw error text rather than a generic
/// message, since the caller is an uncontrolled external client.
pub async fn receive_extension_data(
    State(state): State<AppState>,
    session: SessionId,
    Json(raw): Json<Value>,
) -> Result<Response, AppError> {
    let batch = normalize_payload(&raw).map_err(AppError::Ingest)?;
    let count = batch.data.len();

    tracing::info!(
        "Received {count} results from {} for session {}",
        batch.source,
        session.id
    );

    // The whole ingest boundary reports failures with the raw error text,
    // session write included.
    store_batch(state.sessions.as_ref(), &session.id, &batch)
        .await
        .map_err(|e| AppError::Ingest(e.to_string()))?;

    let body = json!({
        "success": true,
        "message": format!("Received {count} results"),
        "processed_count": count,
        "redirect_url": state.config.frontend_results_url,
    });
    Ok((session.cookie_headers(), Json(body)).into_response())
}

/// GET /api/events/results/get
/// An empty slot is a normal answer, not an error.
pub async fn get_extension_results(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Response, AppError> {
    let stored = if session.fresh {
        None
    } else {
        load_batch(state.sessions.as_ref(), &session.id)
            .await
            .map_err(|e| AppError::Retrieve(e.to_string()))?
    };

    let body = match stored {
        None => json!({
            "results": [],
            "count": 0,
            "message": "No extension data available",
        }),
        Some(batch) => json!({
            "results": batch.data,
            "timestamp": batch.timestamp,
            "source": batch.source,
            "count": batch.data.len(),
            "message": "Extension results retrieved successfully",
        }),
    };
    Ok((session.cookie_headers(), Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use crate::config::Config;
    use crate::extension::normalize::NormalizedRecord;
    use crate::models::event::{EventFields, EventRow, Platform};
    use crate::models::history::SearchHistoryRow;
    use crate::models::saved::{SavedEventDetail, SavedEventRow};
    use crate::repo::{EventRepository, SavedEventRepository, SearchHistoryRepository};
    use crate::session::MemorySessionStore;

    fn batch_from(payload: Value) -> StoredBatch {
        normalize_payload(&payload).unwrap()
    }

    /// Session store whose every operation fails, standing in for an
    /// unreachable Redis.
    struct FailingStore;

    #[async_trait]
    impl crate::session::SessionStore for FailingStore {
        async fn get(&self, _session: &str, _field: &str) -> Result<Option<String>> {
            Err(anyhow::anyhow!("redis connection refused"))
        }
        async fn put(&self, _session: &str, _field: &str, _value: &str) -> Result<()> {
            Err(anyhow::anyhow!("redis connection refused"))
        }
    }

    struct NoEvents;

    #[async_trait]
    impl EventRepository for NoEvents {
        async fn create(&self, _fields: &EventFields) -> Result<EventRow> {
            unimplemented!()
        }
        async fn get(&self, _id: Uuid) -> Result<Option<EventRow>> {
            unimplemented!()
        }
        async fn list(&self) -> Result<Vec<EventRow>> {
            unimplemented!()
        }
        async fn update(&self, _id: Uuid, _fields: &EventFields) -> Result<Option<EventRow>> {
            unimplemented!()
        }
        async fn delete(&self, _id: Uuid) -> Result<bool> {
            unimplemented!()
        }
        async fn search(
            &self,
            _platform: Platform,
            _keywords: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<EventRow>> {
            unimplemented!()
        }
    }

    struct NoSaved;

    #[async_trait]
    impl SavedEventRepository for NoSaved {
        async fn save(&self, _user_id: Uuid, _event_id: Uuid) -> Result<(SavedEventRow, bool)> {
            unimplemented!()
        }
        async fn unsave(&self, _user_id: Uuid, _event_id: Uuid) -> Result<bool> {
            unimplemented!()
        }
        async fn list(&self, _user_id: Uuid) -> Result<Vec<SavedEventDetail>> {
            unimplemented!()
        }
    }

    struct NoHistory;

    #[async_trait]
    impl SearchHistoryRepository for NoHistory {
        async fn record(
            &self,
            _user_id: Uuid,
            _keywords: &str,
            _platform: Platform,
            _start_date: DateTime<Utc>,
            _end_date: DateTime<Utc>,
        ) -> Result<SearchHistoryRow> {
            unimplemented!()
        }
        async fn list(&self, _user_id: Uuid) -> Result<Vec<SearchHistoryRow>> {
            unimplemented!()
        }
    }

    fn state_with_failing_store() -> AppState {
        AppState {
            events: Arc::new(NoEvents),
            saved: Arc::new(NoSaved),
            history: Arc::new(NoHistory),
            sessions: Arc::new(FailingStore),
            config: Config {
                database_url: String::new(),
                redis_url: String::new(),
                frontend_results_url: "http://localhost:5173/results".to_string(),
                db_pool_size: 1,
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    fn existing_session() -> crate::auth::SessionId {
        crate::auth::SessionId {
            id: "s1".to_string(),
            fresh: false,
        }
    }

    #[tokio::test]
    async fn test_empty_slot_reads_back_none() {
        let store = MemorySessionStore::new();
        assert!(load_batch(&store, "s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_ingest_replaces_first_batch() {
        let store = MemorySessionStore::new();

        let first = batch_from(json!({
            "source": "first",
            "data": { "results": [{ "name": "Alice" }, { "name": "Bob" }] }
        }));
        let second = batch_from(json!({
            "source": "second",
            "data": { "results": [{ "name": "Carol" }] }
        }));

        store_batch(&store, "s1", &first).await.unwrap();
        store_batch(&store, "s1", &second).await.unwrap();

        let loaded = load_batch(&store, "s1").await.unwrap().unwrap();
        assert_eq!(loaded.source, "second");
        assert_eq!(loaded.data.len(), 1);
        match &loaded.data[0] {
            NormalizedRecord::Profile(profile) => assert_eq!(profile.name, "Carol"),
            other => panic!("expected profile, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batches_are_scoped_per_session() {
        let store = MemorySessionStore::new();

        let batch = batch_from(json!({
            "data": { "results": [{ "name": "Alice" }] }
        }));
        store_batch(&store, "s1", &batch).await.unwrap();

        assert!(load_batch(&store, "s2").await.unwrap().is_none());
        assert!(load_batch(&store, "s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ingest_store_failure_reports_raw_text() {
        let err = receive_extension_data(
            State(state_with_failing_store()),
            existing_session(),
            Json(json!({ "data": { "results": [{ "name": "Alice" }] } })),
        )
        .await
        .unwrap_err();

        match err {
            AppError::Ingest(msg) => assert!(
                msg.contains("redis connection refused"),
                "raw text lost: {msg}"
            ),
            other => panic!("expected ingest error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retrieve_store_failure_reports_raw_text() {
        let err = get_extension_results(State(state_with_failing_store()), existing_session())
            .await
            .unwrap_err();

        match err {
            AppError::Retrieve(msg) => assert!(
                msg.contains("redis connection refused"),
                "raw text lost: {msg}"
            ),
            other => panic!("expected retrieve error, got {other:?}"),
        }
    }
}
