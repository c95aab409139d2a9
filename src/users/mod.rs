use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub(crate) mod services;
pub mod session;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
