//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"code": "...", "detail": "..."}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use relay_types::error::{ChatError, StorageError, ValidationError};
use relay_types::llm::ProviderError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Rejected user input.
    Validation(ValidationError),
    /// Malformed request body.
    BadRequest(String),
    /// Completion API failure.
    Provider(ProviderError),
    /// Message store failure.
    Storage(StorageError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Validation(e) => AppError::Validation(e),
            ChatError::Provider(e) => AppError::Provider(e),
            ChatError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Provider(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROVIDER_ERROR",
                format!("Model error: {e}"),
            ),
            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                format!("DB error: {e}"),
            ),
        };

        if status.is_server_error() {
            tracing::error!(code, %detail, "Request failed");
        }

        (status, Json(json!({ "code": code, "detail": detail }))).into_response()
    }
}
