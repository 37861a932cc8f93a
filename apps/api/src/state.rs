use std::sync::Arc;

use crate::config::Config;
use crate::repo::{EventRepository, SavedEventRepository, SearchHistoryRepository};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. Handlers see repositories and the session store as traits;
/// the Postgres/Redis implementations are wired up in `main`.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRepository>,
    pub saved: Arc<dyn SavedEventRepository>,
    pub history: Arc<dyn SearchHistoryRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Config,
}
