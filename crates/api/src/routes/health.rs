use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Live project cache status (`subscribing`, `ready`, `failed`, ...).
    pub cache: &'static str,
    /// Document store backend in use.
    pub store: &'static str,
    /// Open WebSocket connections.
    pub ws_connections: usize,
}

/// GET /health -- returns service and project cache health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.cache.state();
    let status = if cache.is_failed() { "degraded" } else { "ok" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        cache: cache.status(),
        store: state.repo.store().backend_name(),
        ws_connections: state.ws_manager.connection_count().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
