//! MessageRepository trait definition.
//!
//! The message store is a single append-only log of chat turns. Rows are
//! inserted by `save`, read by `fetch_history` / `list_conversations`,
//! and removed only by `clear_history`.

use relay_types::chat::{ConversationSummary, Role, StoredMessage};
use relay_types::error::StorageError;

/// Default row cap for `fetch_history`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 200;

/// Default row cap for a single conversation replay.
pub const DEFAULT_CONVERSATION_LIMIT: u32 = 500;

/// Default entry cap for `list_conversations`.
pub const DEFAULT_CONVERSATIONS_LIMIT: u32 = 100;

/// Repository trait for chat message persistence.
///
/// Implementations live in relay-infra (e.g., `SqliteMessageRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MessageRepository: Send + Sync {
    /// Insert one turn. The store assigns `id` and `created_at`.
    ///
    /// Empty `content` is rejected with `StorageError::InvalidMessage`.
    fn save(
        &self,
        role: Role,
        content: &str,
        conversation_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<StoredMessage, StorageError>> + Send;

    /// Messages ordered by ascending `id`, optionally filtered to one
    /// conversation, truncated to the first `limit` rows.
    fn fetch_history(
        &self,
        conversation_id: Option<&str>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMessage>, StorageError>> + Send;

    /// Delete one conversation, or every row when no id is given.
    ///
    /// Returns the number of rows removed.
    fn clear_history(
        &self,
        conversation_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<u64, StorageError>> + Send;

    /// One summary per non-null conversation id, most recent activity first.
    fn list_conversations(
        &self,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationSummary>, StorageError>> + Send;

    /// Count every stored message.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, StorageError>> + Send;
}
