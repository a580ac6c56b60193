//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - GET /conversations       - Summaries, most recently active first
//! - GET /conversation/{id}   - Messages of one conversation, oldest first

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use relay_core::chat::repository::{DEFAULT_CONVERSATION_LIMIT, DEFAULT_CONVERSATIONS_LIMIT};
use relay_types::chat::{ConversationSummary, StoredMessage};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConversationsQuery {
    #[serde(default = "default_conversations_limit")]
    pub limit: u32,
}

fn default_conversations_limit() -> u32 {
    DEFAULT_CONVERSATIONS_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    #[serde(default = "default_conversation_limit")]
    pub limit: u32,
}

fn default_conversation_limit() -> u32 {
    DEFAULT_CONVERSATION_LIMIT
}

/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    query: Result<Query<ConversationsQuery>, QueryRejection>,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let Query(query) = query?;
    let summaries = state.chat_service.conversations(query.limit).await?;
    Ok(Json(summaries))
}

/// GET /conversation/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    query: Result<Query<ConversationQuery>, QueryRejection>,
) -> Result<Json<Vec<StoredMessage>>, AppError> {
    let Query(query) = query?;
    let messages = state
        .chat_service
        .history(Some(&conversation_id), query.limit)
        .await?;
    Ok(Json(messages))
}
