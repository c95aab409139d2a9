use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{PublicUser, RegisterRequest},
    services::register,
    session::{session_cookie, SessionUser},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(get_me))
}

/// POST /users: registers a new email (201) or logs an existing one back in (200).
/// Either way the response carries the user's `sessionId` cookie.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, HeaderMap, Json<PublicUser>)> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "rejected user body");
        AppError::validation(e.body_text())
    })?;

    let registration = register(state.users.as_ref(), payload).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(registration.user.session_id, &state.config.session)?,
    );

    let status = if registration.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, headers, Json(registration.user.into())))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<PublicUser>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip_all)]
pub async fn get_me(SessionUser(user): SessionUser) -> Json<PublicUser> {
    Json(user.into())
}
