use std::collections::BTreeMap;
use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::errors::AppError;
use crate::models::event::{EventFields, EventRow, EventType, Platform};
use crate::search::engine::MAX_KEYWORDS_LEN;
use crate::state::AppState;

const MAX_NAME_LEN: usize = 200;

/// Client-supplied event fields, decoded leniently for per-field validation.
#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub platform: Option<String>,
    pub link: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub keywords: Option<String>,
}

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventRow>>, AppError> {
    let events = state.events.list().await.map_err(AppError::Internal)?;
    Ok(Json(events))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Json(payload): Json<EventPayload>,
) -> Result<(StatusCode, Json<EventRow>), AppError> {
    let fields = validate_payload(&payload)?;
    let event = state
        .events
        .create(&fields)
        .await
        .map_err(AppError::Internal)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventRow>, AppError> {
    let event = state
        .events
        .get(id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))?;
    Ok(Json(event))
}

/// PUT /api/events/:id — full replace; server-assigned fields untouched.
pub async fn update_event(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<EventRow>, AppError> {
    let fields = validate_payload(&payload)?;
    let event = state
        .events
        .update(id, &fields)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))?;
    Ok(Json(event))
}

/// DELETE /api/events/:id — cascades the event's saved rows.
pub async fn delete_event(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .events
        .delete(id)
        .await
        .map_err(AppError::Internal)?;
    if !deleted {
        return Err(AppError::NotFound(format!("Event {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_payload(payload: &EventPayload) -> Result<EventFields, AppError> {
    let mut fields = BTreeMap::new();

    let name = required_text(&mut fields, "name", payload.name.as_deref(), MAX_NAME_LEN);
    let description = required_text(
        &mut fields,
        "description",
        payload.description.as_deref(),
        usize::MAX,
    );
    let keywords = required_text(
        &mut fields,
        "keywords",
        payload.keywords.as_deref(),
        MAX_KEYWORDS_LEN,
    );

    let event_type = match payload.event_type.as_deref().map(EventType::from_str) {
        Some(Ok(t)) => Some(t),
        Some(Err(())) => {
            fields.insert(
                "event_type".to_string(),
                "Must be one of: online, onsite".to_string(),
            );
            None
        }
        None => {
            fields.insert(
                "event_type".to_string(),
                "This field is required".to_string(),
            );
            None
        }
    };

    let platform = match payload.platform.as_deref().map(Platform::from_str) {
        Some(Ok(p)) => Some(p),
        Some(Err(())) => {
            fields.insert(
                "platform".to_string(),
                "Must be one of: linkedin, twitter, facebook, instagram".to_string(),
            );
            None
        }
        None => {
            fields.insert("platform".to_string(), "This field is required".to_string());
            None
        }
    };

    let link = match payload.link.as_deref() {
        Some(l) if l.starts_with("http://") || l.starts_with("https://") => Some(l.to_string()),
        Some(_) => {
            fields.insert("link".to_string(), "Must be an http(s) URL".to_string());
            None
        }
        None => {
            fields.insert("link".to_string(), "This field is required".to_string());
            None
        }
    };

    let start_date = date_field(&mut fields, "start_date", payload.start_date.as_deref());
    let end_date = date_field(&mut fields, "end_date", payload.end_date.as_deref());

    match (event_type, platform, link, start_date, end_date) {
        (Some(event_type), Some(platform), Some(link), Some(start_date), Some(end_date))
            if fields.is_empty() =>
        {
            Ok(EventFields {
                name,
                description,
                event_type,
                platform,
                link,
                start_date,
                end_date,
                keywords,
            })
        }
        _ => Err(AppError::Fields(fields)),
    }
}

fn required_text(
    fields: &mut BTreeMap<String, String>,
    name: &str,
    value: Option<&str>,
    max_len: usize,
) -> String {
    match value.map(str::trim) {
        None | Some("") => {
            fields.insert(name.to_string(), "This field is required".to_string());
            String::new()
        }
        Some(v) if v.chars().count() > max_len => {
            fields.insert(
                name.to_string(),
                format!("Must be at most {max_len} characters"),
            );
            String::new()
        }
        Some(v) => v.to_string(),
    }
}

fn date_field(
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
