//! Inbound message validation and conversation id assignment.

use relay_types::error::ValidationError;
use uuid::Uuid;

/// Trim `raw` and check it is non-empty and at most `max_chars` characters.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn validate_message(raw: &str, max_chars: usize) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }

    let len = text.chars().count();
    if len > max_chars {
        return Err(ValidationError::MessageTooLong {
            max: max_chars,
            actual: len,
        });
    }

    Ok(text.to_string())
}

/// Use the client's conversation id, or mint a fresh one when it is
/// missing or empty.
pub fn resolve_conversation_id(requested: Option<String>) -> String {
    match requested {
        Some(id) if !id.is_empty() => id,
        _ => Uuid::new_v4().to_string(),
    }
}
