use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use liftlog::workout::{SessionLogUpdate, SessionLogView};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionLogFilter {
    session_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session-logs", get(list))
        .route("/session-logs/start/:session_id", post(start))
        .route("/session-logs/:id", get(show).put(update).delete(remove))
        .route("/session-logs/:id/complete", put(complete))
        .route("/session-logs/:id/cancel", put(cancel))
}

async fn start(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(session_id): ApiPath<Uuid>,
) -> Result<(StatusCode, Json<SessionLogView>), ApiError> {
    let view = state.tracker.start(session_id, principal.name()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(filter): ApiQuery<SessionLogFilter>,
) -> Result<Json<Vec<SessionLogView>>, ApiError> {
    Ok(Json(
        state
            .tracker
            .list_session_logs(principal.name(), filter.session_id)
            .await?,
    ))
}

async fn show(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SessionLogView>, ApiError> {
    Ok(Json(state.tracker.get_session_log(id, principal.name()).await?))
}

async fn update(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<SessionLogUpdate>,
) -> Result<Json<SessionLogView>, ApiError> {
    Ok(Json(
        state
            .tracker
            .update_session_log(id, principal.name(), update)
            .await?,
    ))
}

async fn complete(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SessionLogView>, ApiError> {
    Ok(Json(
        state
            .tracker
            .complete_session_log(id, principal.name())
            .await?,
    ))
}

async fn cancel(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SessionLogView>, ApiError> {
    Ok(Json(state.tracker.cancel_session_log(id, principal.name()).await?))
}

async fn remove(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tracker.delete_session_log(id, principal.name()).await?;
    Ok(StatusCode::NO_CONTENT)
}
