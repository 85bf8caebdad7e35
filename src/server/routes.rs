//! HTTP route handlers for the chatbot endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::resolver::{ChatbotReply, ChatbotRequest};

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/chatbot", post(chatbot))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "portfolio-chatbot",
        "model": state.generator.model(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Answer one visitor message.
///
/// Failures are reported in the `error` field; the widget falls back to its
/// local rules on any non-success status.
async fn chatbot(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatbotRequest>,
) -> (StatusCode, Json<ChatbotReply>) {
    if request.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatbotReply::error("message cannot be empty")),
        );
    }

    let prompt = state.persona.prompt_for(&request.message);
    match state.generator.generate(&prompt).await {
        Ok(text) => (StatusCode::OK, Json(ChatbotReply::response(text))),
        Err(e) => {
            tracing::error!(model = state.generator.model(), "LLM error: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ChatbotReply::error(format!("LLM error: {e}"))),
            )
        }
    }
}
