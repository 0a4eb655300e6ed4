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
    /// Whether an intake endpoint is configured.
    pub endpoint_configured: bool,
    /// Approximate number of live visitor sessions.
    pub active_sessions: u64,
}

/// GET /health -- returns service status and whether submissions can be sent.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let endpoint_configured = state.config.onboard_url.is_some();

    let status = if endpoint_configured { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        endpoint_configured,
        active_sessions: state.sessions.len(),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
