//! Route handler functions.
//!
//! Each handler extracts its payload via axum extractors, hands the turn to
//! the orchestrator, and returns JSON. Pipeline failures never surface here:
//! the orchestrator already translated them into a generic reply.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use docent_core::types::IncomingMessage;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for `POST /api/messages`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Replies to send to the chat surface, in order.
    pub replies: Vec<String>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Handle one inbound chat message and return the ordered replies.
pub async fn messages(
    State(state): State<AppState>,
    Json(message): Json<IncomingMessage>,
) -> Result<Json<MessagesResponse>, ApiError> {
    if message.conversation_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "conversation_id must not be empty".to_string(),
        ));
    }

    tracing::debug!(
        conversation = %message.conversation_id,
        attachments = message.attachments.len(),
        "Message received"
    );

    let replies = state.orchestrator.handle_turn(&message).await;
    Ok(Json(MessagesResponse { replies }))
}

/// Liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
