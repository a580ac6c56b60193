use thiserror::Error;

use crate::llm::ProviderError;

/// Errors from message store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// Errors from validating client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Empty message")]
    EmptyMessage,

    #[error("Message too long (max {max} chars)")]
    MessageTooLong { max: usize, actual: usize },
}

/// Errors surfaced by a chat exchange.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model error: {0}")]
    Provider(#[from] ProviderError),

    #[error("DB error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MessageTooLong {
            max: 2000,
            actual: 2001,
        };
        assert_eq!(err.to_string(), "Message too long (max 2000 chars)");
        assert_eq!(ValidationError::EmptyMessage.to_string(), "Empty message");
    }

    #[test]
    fn test_chat_error_wraps_provider_cause() {
        let err: ChatError = ProviderError::Provider {
            message: "connection reset".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Model error:"));
        assert!(err.to_string().contains("connection reset"));
    }
}
