use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use tracing::warn;
use uuid::Uuid;

use super::{repo::UserRepo, repo_types::User};
use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "sessionId";

/// Extract the raw `sessionId` cookie value, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.trim().to_string())
        })
        .find(|v| !v.is_empty())
}

/// `Set-Cookie` value for a session.
pub fn session_cookie(session_id: Uuid, cfg: &SessionConfig) -> AppResult<HeaderValue> {
    let cookie = format!(
        "{SESSION_COOKIE}={session_id}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        cfg.max_age_secs()
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid session cookie: {e}")))
}

/// Resolve a session token to its user.
///
/// A missing token is `Unauthenticated`; a token that is malformed or not
/// bound to any user is `UnknownUser`.
pub async fn resolve_session(users: &dyn UserRepo, token: Option<&str>) -> AppResult<User> {
    let token = token.ok_or(AppError::Unauthenticated)?;
    let Ok(session_id) = Uuid::parse_str(token) else {
        warn!("malformed session cookie");
        return Err(AppError::UnknownUser);
    };
    users
        .find_by_session(session_id)
        .await?
        .ok_or(AppError::UnknownUser)
}

/// User resolved from the `sessionId` cookie.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers);
        let user = resolve_session(state.users.as_ref(), token.as_deref()).await?;
        Ok(SessionUser(user))
    }
}
