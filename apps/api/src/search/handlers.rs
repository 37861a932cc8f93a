use axum::{extract::State, Json};

use crate::auth::{CurrentUser, RequireUser};
use crate::errors::AppError;
use crate::models::history::SearchHistoryRow;
use crate::search::engine::{run_search, SearchRequest, SearchResponse};
use crate::state::AppState;

/// POST /api/events/search
/// Open to anonymous callers; only authenticated searches are logged.
pub async fn search_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let response = run_search(state.events.as_ref(), state.history.as_ref(), user, &req).await?;
    Ok(Json(response))
}

/// GET /api/events/search-history
pub async fn list_search_history(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<SearchHistoryRow>>, AppError> {
    let history = state
        .history
        .list(user)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(history))
}
