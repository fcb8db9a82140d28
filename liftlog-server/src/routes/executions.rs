use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use liftlog::catalog::{ExerciseExecutionInput, ExerciseExecutionUpdate, ExerciseExecutionView};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionFilter {
    session_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/exercise-executions", get(list).post(create))
        .route(
            "/exercise-executions/:id",
            get(show).put(update).delete(remove),
        )
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ExecutionFilter>,
) -> Result<Json<Vec<ExerciseExecutionView>>, ApiError> {
    Ok(Json(state.catalog.list_executions(filter.session_id).await?))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ExerciseExecutionView>, ApiError> {
    Ok(Json(state.catalog.get_execution(id).await?))
}

async fn create(
    State(state): State<AppState>,
    _principal: Principal,
    ApiJson(input): ApiJson<ExerciseExecutionInput>,
) -> Result<(StatusCode, Json<ExerciseExecutionView>), ApiError> {
    let view = state.catalog.create_execution(input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update(
    State(state): State<AppState>,
    _principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<ExerciseExecutionUpdate>,
) -> Result<Json<ExerciseExecutionView>, ApiError> {
    Ok(Json(state.catalog.update_execution(id, update).await?))
}

async fn remove(
    State(state): State<AppState>,
    _principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_execution(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
