use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use liftlog::workout::{ExecutionLogUpdate, ExecutionLogView};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionLogFilter {
    session_log_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/execution-logs", get(list))
        .route("/execution-logs/:id", get(show).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(filter): ApiQuery<ExecutionLogFilter>,
) -> Result<Json<Vec<ExecutionLogView>>, ApiError> {
    Ok(Json(
        state
            .tracker
            .list_execution_logs(principal.name(), filter.session_log_id)
            .await?,
    ))
}

async fn show(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ExecutionLogView>, ApiError> {
    Ok(Json(state.tracker.get_execution_log(id, principal.name()).await?))
}

async fn update(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<ExecutionLogUpdate>,
) -> Result<Json<ExecutionLogView>, ApiError> {
    Ok(Json(
        state
            .tracker
            .update_execution_log(id, principal.name(), update)
            .await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tracker.delete_execution_log(id, principal.name()).await?;
    Ok(StatusCode::NO_CONTENT)
}
