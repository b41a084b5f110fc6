//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::Instrument;

use dispatch_core::{ChatRequest, ChatResponse};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ai_connected: bool,
}

/// Health check endpoint with an AI-backend connectivity probe
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ai_connected = state.ai.health_check().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ai_connected,
    })
}

/// Main chat endpoint
///
/// Every outcome keeps the same envelope; the status code distinguishes
/// service faults from clarification requests (which stay 200).
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let trace_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %trace_id, caller = %payload.caller);

    let result = state.router.route(&payload).instrument(span).await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            let status = if e.is_clarification() {
                StatusCode::OK
            } else if e.is_upstream() {
                tracing::error!(%trace_id, error = %e, "AI backend failure");
                StatusCode::BAD_GATEWAY
            } else {
                tracing::error!(%trace_id, error = %e, "route failed");
                StatusCode::INTERNAL_SERVER_ERROR
            };

            (status, Json(ChatResponse::error(e.user_message())))
        }
    }
}
