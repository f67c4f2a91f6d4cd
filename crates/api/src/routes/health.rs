//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether an object store is configured for audits.
    pub storage_configured: bool,
    /// Configured storage provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_provider: Option<&'static str>,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        storage_configured: state.storage.is_some(),
        storage_provider: state.storage.as_ref().map(|s| s.provider_name()),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
