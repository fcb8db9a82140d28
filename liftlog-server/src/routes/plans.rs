use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use liftlog::catalog::{PlanInput, PlanUpdate, PlanView};
use uuid::Uuid;

use crate::auth::{MaybePrincipal, Principal};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list).post(create))
        .route("/plans/:id", get(show).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    viewer: MaybePrincipal,
) -> Result<Json<Vec<PlanView>>, ApiError> {
    Ok(Json(state.catalog.list_plans(viewer.name()).await?))
}

async fn show(
    State(state): State<AppState>,
    viewer: MaybePrincipal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PlanView>, ApiError> {
    Ok(Json(state.catalog.get_plan(id, viewer.name()).await?))
}

async fn create(
    State(state): State<AppState>,
    _principal: Principal,
    ApiJson(input): ApiJson<PlanInput>,
) -> Result<(StatusCode, Json<PlanView>), ApiError> {
    let view = state.catalog.create_plan(input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<PlanUpdate>,
) -> Result<Json<PlanView>, ApiError> {
    Ok(Json(
        state
            .catalog
            .update_plan(id, update, Some(principal.name()))
            .await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    _principal: Principal,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_plan(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
