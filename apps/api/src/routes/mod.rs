pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::events::handlers as events;
use crate::extension::handlers as extension;
use crate::saved::handlers as saved;
use crate::search::handlers as search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Event CRUD: reads open, writes require auth
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Search
        .route("/api/events/search", post(search::search_events))
        .route(
            "/api/events/search-history",
            get(search::list_search_history),
        )
        // Saved-event ledger
        .route("/api/events/save", post(saved::save_event))
        .route("/api/events/unsave/:event_id", delete(saved::unsave_event))
        .route("/api/events/saved", get(saved::list_saved_events))
        // Browser extension endpoints (AllowAny)
        .route("/api/events/results", post(extension::receive_extension_data))
        .route(
            "/api/events/results/get",
            get(extension::get_extension_results),
        )
        .with_state(state)
}
