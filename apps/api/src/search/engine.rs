use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::event::{EventRow, Platform};
use crate::repo::{EventRepository, SearchHistoryRepository};
use crate::search::demo;

pub const MAX_KEYWORDS_LEN: usize = 500;

/// Raw search body. Fields are decoded leniently so that validation can
/// report every problem per field instead of failing on the first one.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub keywords: Option<String>,
    pub platform: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidatedSearch {
    pub keywords: String,
    pub platform: Platform,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<EventRow>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Validates a search request, collecting one message per offending field.
/// The start/end ordering check lives here at the request boundary; neither
/// the engine nor the repository re-checks it.
pub fn validate(req: &SearchRequest) -> Result<ValidatedSearch, AppError> {
    let mut fields = BTreeMap::new();

    let keywords = match req.keywords.as_deref().map(str::trim) {
        None | Some("") => {
            fields.insert("keywords".to_string(), "This field is required".to_string());
            String::new()
        }
        // Character count, not byte length: multibyte keywords under the
        // limit must pass.
        Some(k) if k.chars().count() > MAX_KEYWORDS_LEN => {
            fields.insert(
                "keywords".to_string(),
                format!("Must be at most {MAX_KEYWORDS_LEN} characters"),
            );
            String::new()
        }
        Some(k) => k.to_string(),
    };

    let platform = match req.platform.as_deref() {
        None => {
            fields.insert("platform".to_string(), "This field is required".to_string());
            None
        }
        Some(p) => match Platform::from_str(p) {
            Ok(platform) => Some(platform),
            Err(()) => {
                fields.insert(
                    "platform".to_string(),
                    "Must be one of: linkedin, twitter, facebook, instagram".to_string(),
                );
                None
            }
        },
    };

    let start_date = parse_date_field(&mut fields, "start_date", req.start_date.as_deref());
    let end_date = parse_date_field(&mut fields, "end_date", req.end_date.as_deref());

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            fields.insert(
                "start_date".to_string(),
                "Start date must be before end date".to_string(),
            );
        }
    }

    match (platform, start_date, end_date) {
        (Some(platform), Some(start_date), Some(end_date)) if fields.is_empty() => {
            Ok(ValidatedSearch {
                keywords,
                platform,
                start_date,
                end_date,
            })
        }
        _ => Err(AppError::Fields(fields)),
    }
}

fn parse_date_field(
    fields: &mut BTreeMap<String, String>,
    name: &str,
    value: Option<&str>,
) -> Option<DateTime<Utc>> {
    match value {
        None => {
            fields.insert(name.to_string(), "This field is required".to_string());
            None
        }
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(_) => {
                fields.insert(
                    name.to_string(),
                    "Must be a valid RFC 3339 datetime".to_string(),
                );
                None
            }
        },
    }
}

/// Runs a search end to end: validate, log to history for authenticated
/// callers, query the store, and fall back to synthetic results when the
/// query matched nothing. History is recorded before the query runs, so a
/// zero-row search still leaves a trace.
pub async fn run_search(
    events: &dyn EventRepository,
    history: &dyn SearchHistoryRepository,
    user: Option<Uuid>,
    req: &SearchRequest,
) -> Result<SearchResponse, AppError> {
    let query = validate(req)?;

    if let Some(user_id) = user {
        history
            .record(
                user_id,
                &query.keywords,
                query.platform,
                query.start_date,
                query.end_date,
            )
            .await
            .map_err(AppError::Internal)?;
    }

    let rows = events
        .search(
            query.platform,
            &query.keywords,
            query.start_date,
            query.end_date,
        )
        .await
        .map_err(AppError::Internal)?;

    if rows.is_empty() {
        let samples = demo::sample_events(query.platform, query.start_date);
        info!(
            "Search for '{}' on {} matched nothing; returning {} sample events",
            query.keywords,
            query.platform,
            samples.len()
        );
        return Ok(SearchResponse {
            count: samples.len(),
            results: samples,
            message: Some(demo::DEMO_MESSAGE.to_string()),
        });
    }

    Ok(SearchResponse {
        count: rows.len(),
        results: rows,
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    use crate::models::event::EventFields;
    use crate::models::history::SearchHistoryRow;

    fn request(keywords: &str, platform: &str) -> SearchRequest {
        SearchRequest {
            keywords: Some(keywords.to_string()),
            platform: Some(platform.to_string()),
            start_date: Some("2024-06-01T00:00:00Z".to_string()),
            end_date: Some("2024-07-01T00:00:00Z".to_string()),
        }
    }

    fn stored_event(platform: Platform) -> EventRow {
        let now = Utc::now();
        EventRow {
            id: Uuid::new_v4(),
            name: "AI Careers Fair".to_string(),
            description: "Panel on machine learning roles".to_string(),
            event_type: "online".to_string(),
            platform: platform.as_str().to_string(),
            link: "https://example.com/fair".to_string(),
            start_date: now,
            end_date: now + Duration::hours(3),
            keywords: "AI, careers".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Event repository that returns a preset result set for any search.
    struct StubEvents {
        results: Vec<EventRow>,
    }

    #[async_trait]
    impl EventRepository for StubEvents {
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
            Ok(self.results.clone())
        }
    }

    #[derive(Default)]
    struct RecordingHistory {
        recorded: Mutex<Vec<(Uuid, String)>>,
    }

    #[async_trait]
    impl SearchHistoryRepository for RecordingHistory {
        async fn record(
            &self,
            user_id: Uuid,
            keywords: &str,
            platform: Platform,
            start_date: DateTime<Utc>,
            end_date: DateTime<Utc>,
        ) -> Result<SearchHistoryRow> {
            self.recorded
                .lock()
                .unwrap()
                .push((user_id, keywords.to_string()));
            Ok(SearchHistoryRow {
                id: Uuid::new_v4(),
                user_id: Some(user_id),
                keywords: keywords.to_string(),
                platform: platform.as_str().to_string(),
                start_date,
                end_date,
                searched_at: Utc::now(),
            })
        }

        async fn list(&self, _user_id: Uuid) -> Result<Vec<SearchHistoryRow>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_validate_missing_fields() {
        let err = validate(&SearchRequest::default()).unwrap_err();
        match err {
            AppError::Fields(fields) => {
                assert!(fields.contains_key("keywords"));
                assert!(fields.contains_key("platform"));
                assert!(fields.contains_key("start_date"));
                assert!(fields.contains_key("end_date"));
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_platform() {
        let err = validate(&request("AI", "myspace")).unwrap_err();
        match err {
            AppError::Fields(fields) => assert!(fields.contains_key("platform")),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let req = SearchRequest {
            start_date: Some("2024-07-01T00:00:00Z".to_string()),
            end_date: Some("2024-06-01T00:00:00Z".to_string()),
            ..request("AI", "linkedin")
        };
        let err = validate(&req).unwrap_err();
        match err {
            AppError::Fields(fields) => {
                assert_eq!(
                    fields.get("start_date").map(String::as_str),
                    Some("Start date must be before end date")
                );
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_overlong_keywords() {
        let err = validate(&request(&"x".repeat(501), "linkedin")).unwrap_err();
        match err {
            AppError::Fields(fields) => assert!(fields.contains_key("keywords")),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_keywords_limit_counts_characters_not_bytes() {
        // 500 two-byte characters: over the limit in bytes, at it in chars.
        let query = validate(&request(&"é".repeat(MAX_KEYWORDS_LEN), "linkedin")).unwrap();
        assert_eq!(query.keywords.chars().count(), MAX_KEYWORDS_LEN);
    }

    #[tokio::test]
    async fn test_matching_events_returned_verbatim() {
        let events = StubEvents {
            results: vec![stored_event(Platform::Linkedin)],
        };
        let history = RecordingHistory::default();

        let response = run_search(&events, &history, None, &request("AI", "linkedin"))
            .await
            .unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.results[0].name, "AI Careers Fair");
        assert!(response.message.is_none());
    }

    #[tokio::test]
    async fn test_empty_result_falls_back_to_samples() {
        let events = StubEvents { results: vec![] };
        let history = RecordingHistory::default();

        let response = run_search(&events, &history, None, &request("AI", "linkedin"))
            .await
            .unwrap();

        assert!(response.count >= 1);
        assert!(response.results.iter().all(|e| e.platform == "linkedin"));
        assert_eq!(response.message.as_deref(), Some(demo::DEMO_MESSAGE));
    }

    #[tokio::test]
    async fn test_authenticated_search_is_logged_even_when_empty() {
        let events = StubEvents { results: vec![] };
        let history = RecordingHistory::default();
        let user = Uuid::new_v4();

        run_search(&events, &history, Some(user), &request("AI", "twitter"))
            .await
            .unwrap();

        let recorded = history.recorded.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0], (user, "AI".to_string()));
    }

    #[tokio::test]
    async fn test_anonymous_search_is_not_logged() {
        let events = StubEvents { results: vec![] };
        let history = RecordingHistory::default();

        run_search(&events, &history, None, &request("AI", "twitter"))
            .await
            .unwrap();

        assert!(history.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_has_no_side_effects() {
        let events = StubEvents { results: vec![] };
        let history = RecordingHistory::default();
        let user = Uuid::new_v4();

        let result = run_search(&events, &history, Some(user), &request("AI", "myspace")).await;

        assert!(result.is_err());
        assert!(history.recorded.lock().unwrap().is_empty());
    }
}
