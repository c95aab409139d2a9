mod dto;
pub mod handlers;
pub mod metrics;
pub mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

#[cfg(test)]
pub use dto::MealResponse;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::meal_routes())
}
