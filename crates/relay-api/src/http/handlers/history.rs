//! History HTTP handlers.
//!
//! Endpoints:
//! - GET  /history       - Stored messages, oldest first
//! - POST /history/clear - Delete one conversation or everything

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use relay_core::chat::repository::DEFAULT_HISTORY_LIMIT;
use relay_types::chat::StoredMessage;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for GET /history.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default, alias = "conversation_id")]
    pub conversation_id: Option<String>,
    #[serde(default = "default_history_limit")]
    pub limit: u32,
}

fn default_history_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

/// Query parameters for POST /history/clear.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearQuery {
    #[serde(default, alias = "conversation_id")]
    pub conversation_id: Option<String>,
}

/// Optional body for POST /history/clear.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRequest {
    #[serde(default, alias = "conversation_id")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    pub detail: ClearDetail,
}

#[derive(Debug, Serialize)]
pub struct ClearDetail {
    pub deleted: u64,
}

/// An empty query value means "no filter".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// GET /history - Messages ascending by id, optionally scoped to one conversation.
pub async fn get_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<StoredMessage>>, AppError> {
    let Query(query) = query?;
    let conversation_id = non_empty(query.conversation_id);
    let messages = state
        .chat_service
        .history(conversation_id.as_deref(), query.limit)
        .await?;

    Ok(Json(messages))
}

/// POST /history/clear - Delete matching rows and report how many went.
///
/// The conversation filter comes from the JSON body when it names one,
/// otherwise from the query string. With neither, or an empty id, every
/// message is deleted.
pub async fn clear_history(
    State(state): State<AppState>,
    query: Result<Query<ClearQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<ClearResponse>, AppError> {
    let Query(query) = query?;
    let req = parse_clear_body(&body)?;
    let conversation_id = clear_filter(req, query);
    let deleted = state
        .chat_service
        .clear_history(conversation_id.as_deref())
        .await?;

    Ok(Json(ClearResponse {
        status: "ok",
        detail: ClearDetail { deleted },
    }))
}

fn clear_filter(body: ClearRequest, query: ClearQuery) -> Option<String> {
    non_empty(body.conversation_id).or_else(|| non_empty(query.conversation_id))
}

fn parse_clear_body(body: &[u8]) -> Result<ClearRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ClearRequest::default());
    }
    // A JSON `null` body is the same as no body.
    serde_json::from_slice::<Option<ClearRequest>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}
