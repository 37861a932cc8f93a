//! Session identity at the boundary with the auth service.
//!
//! Registration, login and profile management live in a separate service.
//! This module only reads what that service leaves behind: the `sessionid`
//! cookie on the request and the session's `user_id` binding in the shared
//! session store.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sessionid";
const USER_FIELD: &str = "user_id";

/// The caller's session identity. When the request carries no session
/// cookie a fresh id is minted; the handler is responsible for setting the
/// cookie on the response (see [`SessionId::cookie_headers`]).
#[derive(Debug, Clone)]
pub struct SessionId {
    pub id: String,
    pub fresh: bool,
}

impl SessionId {
    /// Headers to attach to the response: a `Set-Cookie` for fresh
    /// sessions, empty otherwise.
    pub fn cookie_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.fresh {
            let cookie = format!(
                "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
                self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.insert(SET_COOKIE, value);
            }
        }
        headers
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(id) = cookie_value(&parts.headers, SESSION_COOKIE) {
            return Ok(SessionId { id, fresh: false });
        }
        Ok(SessionId {
            id: Uuid::new_v4().simple().to_string(),
            fresh: true,
        })
    }
}

/// The authenticated user bound to the session, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Uuid>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = SessionId::from_request_parts(parts, state).await?;
        if session.fresh {
            return Ok(CurrentUser(None));
        }
        let user = state
            .sessions
            .get(&session.id, USER_FIELD)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?
            .and_then(|v| Uuid::parse_str(&v).ok());
        Ok(CurrentUser(user))
    }
}

/// Rejects with 401 when the session carries no user binding.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await? {
            CurrentUser(Some(user)) => Ok(RequireUser(user)),
            CurrentUser(None) => Err(AppError::Unauthorized),
        }
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
