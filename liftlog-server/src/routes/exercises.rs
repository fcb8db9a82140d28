use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use liftlog::catalog::{ExerciseInput, ExerciseView};
use liftlog::db::models::ExerciseCategory;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list).post(create))
        .route("/exercises/categories", get(categories))
        .route("/exercises/:id", get(show).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<ExerciseView>>, ApiError> {
    Ok(Json(state.catalog.list_exercises().await?))
}

async fn categories(State(state): State<AppState>) -> Json<Vec<ExerciseCategory>> {
    Json(state.catalog.exercise_categories())
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ExerciseView>, ApiError> {
    Ok(Json(state.catalog.get_exercise(id).await?))
}

async fn create(
    State(state): State<AppState>,
    _principal: Principal,
    ApiJson(input): ApiJson<ExerciseInput>,
) -> Result<(StatusCode, Json<ExerciseView>), ApiError> {
    let view = state.catalog.create_exercise(input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update(
    State(state): State<AppState>,
    _principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ExerciseInput>,
) -> Result<Json<ExerciseView>, ApiError> {
    Ok(Json(state.catalog.update_exercise(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    _principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_exercise(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
