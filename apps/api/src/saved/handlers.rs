use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::errors::AppError;
use crate::models::event::EventRow;
use crate::models::saved::SavedEventDetail;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct SavedResponse {
    id: Uuid,
    event: EventRow,
    saved_at: DateTime<Utc>,
}

/// POST /api/events/save
/// Idempotent: saving an already-saved event answers 200 instead of 201.
pub async fn save_event(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(req): Json<SaveRequest>,
) -> Result<Response, AppError> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::field("event_id", "This field is required"))?;

    let event = state
        .events
        .get(event_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Event {event_id} not found")))?;

    let (row, created) = state
        .saved
        .save(user, event_id)
        .await
        .map_err(AppError::Internal)?;

    if created {
        let body = SavedResponse {
            id: row.id,
            event,
            saved_at: row.saved_at,
        };
        Ok((StatusCode::CREATED, Json(body)).into_response())
    } else {
        Ok((StatusCode::OK, Json(json!({ "message": "Event already saved" }))).into_response())
    }
}

/// DELETE /api/events/unsave/:event_id
pub async fn unsave_event(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = state
        .saved
        .unsave(user, event_id)
        .await
        .map_err(AppError::Internal)?;
    if !removed {
        return Err(AppError::NotFound("Saved event not found".to_string()));
    }
    Ok(Json(json!({ "message": "Event removed from saved" })))
}

/// GET /api/events/saved
pub async fn list_saved_events(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<SavedEventDetail>>, AppError> {
    let saved = state.saved.list(user).await.map_err(AppError::Internal)?;
    Ok(Json(saved))
}
