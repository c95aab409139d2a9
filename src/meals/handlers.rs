use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateMealRequest, MealResponse, UpdateMealRequest},
    metrics::{summarize, MealMetrics},
    services::{validate_changes, validate_new_meal},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::session::SessionUser,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/metrics", get(get_metrics))
        .route(
            "/meals/:meal_id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(v)| v).map_err(|e| {
        warn!(error = %e, "rejected meal body");
        AppError::validation(e.body_text())
    })
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    payload: Result<Json<CreateMealRequest>, JsonRejection>,
) -> AppResult<(StatusCode, HeaderMap, Json<MealResponse>)> {
    let new = validate_new_meal(body(payload)?)?;
    let meal = state.meals.create(user.id, new).await?;
    info!(meal_id = %meal.id, "meal created");

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/meals/{}", meal.id))
        .map_err(|e| AppError::Internal(e.into()))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(meal.into())))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> AppResult<Json<Vec<MealResponse>>> {
    let meals = state.meals.list_by_user(user.id).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(meal_id): Path<Uuid>,
) -> AppResult<Json<MealResponse>> {
    let meal = state
        .meals
        .get(user.id, meal_id)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;
    Ok(Json(meal.into()))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(meal_id): Path<Uuid>,
    payload: Result<Json<UpdateMealRequest>, JsonRejection>,
) -> AppResult<Json<MealResponse>> {
    let changes = validate_changes(body(payload)?)?;
    let meal = state
        .meals
        .update(user.id, meal_id, changes)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;
    info!(%meal_id, "meal updated");
    Ok(Json(meal.into()))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(meal_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.meals.delete(user.id, meal_id).await? {
        return Err(AppError::NotFound("Meal"));
    }
    info!(%meal_id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_metrics(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> AppResult<Json<MealMetrics>> {
    let meals = state.meals.list_by_user(user.id).await?;
    Ok(Json(summarize(&meals)))
}
