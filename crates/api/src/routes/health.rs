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
    /// Whether the Manim CLI answered its version check.
    pub renderer_available: bool,
    /// Version string reported by Manim, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer_version: Option<String>,
}

/// GET /health -- returns service and renderer health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let renderer_version = state.renderer.check_installation().await.ok();
    let renderer_available = renderer_version.is_some();

    let status = if renderer_available { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        renderer_available,
        renderer_version,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
