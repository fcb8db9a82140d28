use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use liftlog::catalog::{SessionInput, SessionUpdate, SessionView};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{MaybePrincipal, Principal};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFilter {
    plan_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list).post(create))
        .route("/sessions/:id", get(show).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    viewer: MaybePrincipal,
    ApiQuery(filter): ApiQuery<SessionFilter>,
) -> Result<Json<Vec<SessionView>>, ApiError> {
    Ok(Json(
        state
            .catalog
            .list_sessions(filter.plan_id, viewer.name())
            .await?,
    ))
}

async fn show(
    State(state): State<AppState>,
    viewer: MaybePrincipal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(state.catalog.get_session(id, viewer.name()).await?))
}

async fn create(
    State(state): State<AppState>,
    _principal: Principal,
    ApiJson(input): ApiJson<SessionInput>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let view = state.catalog.create_session(input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<SessionUpdate>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(
        state
            .catalog
            .update_session(id, update, Some(principal.name()))
            .await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    _principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
