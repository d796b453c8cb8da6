//! GET /health: liveness plus a best-effort probe of the chat provider.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    /// Provider probe; absent when the chat service runs offline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<HealthStatus>,
}

/// Always 200: a failing provider probe shows up as `llm.ok = false`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "WizEdia Backend is running successfully!",
        version: env!("CARGO_PKG_VERSION"),
        llm: state.chat.health().await,
    })
}
