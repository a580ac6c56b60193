//! Chat HTTP handler.
//!
//! Endpoint:
//! - POST /chat - Send one message to the model and return its reply

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use relay_types::chat::ChatReply;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Missing is treated like empty and rejected by validation.
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_save")]
    pub save: bool,
    #[serde(default, alias = "conversation_id")]
    pub conversation_id: Option<String>,
}

fn default_save() -> bool {
    true
}

/// POST /chat - Validate, persist the user turn, ask the model, persist the reply.
pub async fn chat(
    State(state): State<AppState>,
    req: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(req) = req?;
    let reply = state
        .chat_service
        .chat(&req.message, req.conversation_id, req.save)
        .await?;

    Ok(Json(reply))
}
