//! HTTP JSON API over the liftlog core, mounted under `/api/v1`.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use anyhow::Result;
use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use log::info;
use tokio::net::TcpListener;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::exercises::router())
        .merge(routes::plans::router())
        .merge(routes::sessions::router())
        .merge(routes::executions::router())
        .merge(routes::session_logs::router())
        .merge(routes::execution_logs::router());

    Router::new()
        .route("/healthz", get(routes::health))
        .nest("/api/v1", api)
        .fallback(routes::fallback)
        .layer(from_fn_with_state(state.clone(), auth::authenticate))
        .layer(from_fn(middleware::request_context))
        .with_state(state)
}

/// Opens the database, binds the listener and serves until ctrl-c.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let pool = liftlog::db::connect(&config.database_url).await?;
    let router = build_router(AppState::new(pool));

    let listener = TcpListener::bind(config.listen).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
    }
}
