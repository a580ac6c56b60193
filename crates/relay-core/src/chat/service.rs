//! Chat service orchestrating a single exchange and history access.
//!
//! `ChatService` coordinates the `MessageRepository` and the reply
//! provider: validate the message, persist the user turn, await the
//! provider, persist the bot turn, return the reply. Read and clear
//! operations pass straight through to the repository.

use relay_types::chat::{ChatReply, ConversationSummary, Role, StoredMessage};
use relay_types::config::DEFAULT_MAX_MESSAGE_CHARS;
use relay_types::error::{ChatError, StorageError};
use relay_types::llm::DEFAULT_SYSTEM_PROMPT;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::chat::repository::MessageRepository;
use crate::chat::validation::{resolve_conversation_id, validate_message};
use crate::llm::box_provider::BoxReplyProvider;

/// What to do when persisting a chat turn fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// Log the failure and carry on with the exchange.
    #[default]
    BestEffort,
    /// Fail the exchange with the storage error.
    Propagate,
}

/// Orchestrates chat exchanges and history queries.
///
/// Generic over `MessageRepository` to maintain clean architecture
/// (relay-core never depends on relay-infra).
pub struct ChatService<R: MessageRepository> {
    repo: R,
    provider: BoxReplyProvider,
    system_prompt: String,
    max_message_chars: usize,
    turn_save_policy: SavePolicy,
}

impl<R: MessageRepository> ChatService<R> {
    /// Create a service with the default system prompt, the 2000 character
    /// message cap, and best-effort turn persistence.
    pub fn new(repo: R, provider: BoxReplyProvider) -> Self {
        Self {
            repo,
            provider,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            turn_save_policy: SavePolicy::BestEffort,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    pub fn with_turn_save_policy(mut self, policy: SavePolicy) -> Self {
        self.turn_save_policy = policy;
        self
    }

    /// Access the message repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Access the reply provider.
    pub fn provider(&self) -> &BoxReplyProvider {
        &self.provider
    }

    /// Run one exchange.
    ///
    /// Validation happens before anything is written. A provider failure
    /// aborts the exchange after the user turn may already have been
    /// stored; turn persistence failures follow the configured
    /// [`SavePolicy`].
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<String>,
        save: bool,
    ) -> Result<ChatReply, ChatError> {
        let text = validate_message(message, self.max_message_chars)?;
        let conversation_id = resolve_conversation_id(conversation_id);

        if save {
            self.persist_turn(Role::User, &text, &conversation_id).await?;
        }

        let span = info_span!(
            "relay.reply",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = self.provider.model(),
            conversation_id = %conversation_id,
        );
        let reply = self
            .provider
            .get_reply(&text, &self.system_prompt)
            .instrument(span)
            .await
            .inspect_err(|e| {
                warn!(conversation_id = %conversation_id, error = %e, "Model call failed");
            })?;

        if save {
            self.persist_turn(Role::Bot, &reply, &conversation_id).await?;
        }

        info!(conversation_id = %conversation_id, saved = save, "Chat exchange completed");

        Ok(ChatReply {
            reply,
            conversation_id,
        })
    }

    /// Save one turn, applying the turn save policy to failures.
    ///
    /// Returns `Ok(None)` when a best-effort save was skipped.
    async fn persist_turn(
        &self,
        role: Role,
        content: &str,
        conversation_id: &str,
    ) -> Result<Option<StoredMessage>, StorageError> {
        match self.repo.save(role, content, Some(conversation_id)).await {
            Ok(stored) => {
                debug!(id = stored.id, role = %role, conversation_id, "Turn saved");
                Ok(Some(stored))
            }
            Err(e) => match self.turn_save_policy {
                SavePolicy::BestEffort => {
                    warn!(role = %role, conversation_id, error = %e, "Failed to save turn, continuing");
                    Ok(None)
                }
                SavePolicy::Propagate => Err(e),
            },
        }
    }

    /// Messages oldest-to-newest, optionally scoped to one conversation.
    pub async fn history(
        &self,
        conversation_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        self.repo.fetch_history(conversation_id, limit).await
    }

    /// Delete one conversation or the whole log. Returns the deleted count.
    pub async fn clear_history(&self, conversation_id: Option<&str>) -> Result<u64, StorageError> {
        let deleted = self.repo.clear_history(conversation_id).await?;
        info!(conversation_id = ?conversation_id, deleted, "History cleared");
        Ok(deleted)
    }

    /// Conversation summaries, most recently active first.
    pub async fn conversations(&self, limit: u32) -> Result<Vec<ConversationSummary>, StorageError> {
        self.repo.list_conversations(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ReplyProvider;
    use chrono::Utc;
    use relay_types::error::ValidationError;
    use relay_types::llm::ProviderError;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // --- Test doubles ---

    #[derive(Default)]
    struct MemoryRepo {
        rows: Mutex<Vec<StoredMessage>>,
        fail_saves: bool,
    }

    impl MemoryRepo {
        fn failing() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail_saves: true,
            }
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    impl MessageRepository for MemoryRepo {
        async fn save(
            &self,
            role: Role,
            content: &str,
            conversation_id: Option<&str>,
        ) -> Result<StoredMessage, StorageError> {
            if self.fail_saves {
                return Err(StorageError::Connection("database is locked".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            let stored = StoredMessage {
                id: rows.len() as i64 + 1,
                conversation_id: conversation_id.map(str::to_string),
                role,
                content: content.to_string(),
                created_at: Utc::now(),
            };
            rows.push(stored.clone());
            Ok(stored)
        }

        async fn fetch_history(
            &self,
            conversation_id: Option<&str>,
            limit: u32,
        ) -> Result<Vec<StoredMessage>, StorageError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| conversation_id.is_none() || r.conversation_id.as_deref() == conversation_id)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn clear_history(&self, conversation_id: Option<&str>) -> Result<u64, StorageError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| conversation_id.is_some() && r.conversation_id.as_deref() != conversation_id);
            Ok((before - rows.len()) as u64)
        }

        async fn list_conversations(
            &self,
            limit: u32,
        ) -> Result<Vec<ConversationSummary>, StorageError> {
            let rows = self.rows.lock().unwrap();
            let mut by_conv: BTreeMap<String, (StoredMessage, u64)> = BTreeMap::new();
            for row in rows.iter() {
                if let Some(cid) = &row.conversation_id {
                    let entry = by_conv.entry(cid.clone()).or_insert((row.clone(), 0));
                    entry.0 = row.clone();
                    entry.1 += 1;
                }
            }
            let mut out: Vec<_> = by_conv
                .into_iter()
                .map(|(cid, (last, count))| ConversationSummary {
                    conversation_id: cid,
                    last_role: last.role,
                    last_message: last.content,
                    last_time: last.created_at,
                    count,
                })
                .collect();
            out.sort_by(|a, b| b.last_time.cmp(&a.last_time));
            out.truncate(limit as usize);
            Ok(out)
        }

        async fn count_messages(&self) -> Result<u64, StorageError> {
            Ok(self.len() as u64)
        }
    }

    struct EchoProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl EchoProvider {
        fn ok(calls: Arc<AtomicUsize>) -> Self {
            Self { calls, fail: false }
        }

        fn failing(calls: Arc<AtomicUsize>) -> Self {
            Self { calls, fail: true }
        }
    }

    impl ReplyProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        async fn get_reply(
            &self,
            user_message: &str,
            _system_prompt: &str,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Provider {
                    message: "upstream unavailable".to_string(),
                });
            }
            Ok(format!("echo: {user_message}"))
        }
    }

    fn service(repo: MemoryRepo, provider: EchoProvider) -> ChatService<MemoryRepo> {
        ChatService::new(repo, BoxReplyProvider::new(provider))
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_chat_persists_both_turns() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls.clone()));

        let reply = svc
            .chat("  hello  ", Some("conv-1".to_string()), true)
            .await
            .unwrap();

        assert_eq!(reply.reply, "echo: hello");
        assert_eq!(reply.conversation_id, "conv-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let rows = svc.history(Some("conv-1"), 200).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].role, Role::User);
        assert_eq!(rows[0].content, "hello");
        assert_eq!(rows[1].role, Role::Bot);
        assert_eq!(rows[1].content, "echo: hello");
    }

    #[tokio::test]
    async fn test_chat_generates_conversation_id() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls));

        let reply = svc.chat("hi", None, true).await.unwrap();
        assert!(uuid::Uuid::parse_str(&reply.conversation_id).is_ok());

        let rows = svc.history(Some(&reply.conversation_id), 200).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_without_save_writes_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls));

        let reply = svc.chat("hi", Some("c".to_string()), false).await.unwrap();
        assert_eq!(reply.reply, "echo: hi");
        assert_eq!(svc.repo().len(), 0);
    }

    #[tokio::test]
    async fn test_blank_message_rejected_before_any_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls.clone()));

        let err = svc.chat("   ", None, true).await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(ValidationError::EmptyMessage)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(svc.repo().len(), 0);
    }

    #[tokio::test]
    async fn test_too_long_message_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls.clone()));

        let err = svc.chat(&"x".repeat(2001), None, true).await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Validation(ValidationError::MessageTooLong { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_custom_message_cap() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls)).with_max_message_chars(5);

        assert!(svc.chat("12345", None, false).await.is_ok());
        assert!(svc.chat("123456", None, false).await.is_err());
    }

    #[tokio::test]
    async fn test_best_effort_save_failure_still_replies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::failing(), EchoProvider::ok(calls.clone()));

        let reply = svc.chat("hello", Some("c".to_string()), true).await.unwrap();
        assert_eq!(reply.reply, "echo: hello");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_propagate_save_failure_aborts_before_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::failing(), EchoProvider::ok(calls.clone()))
            .with_turn_save_policy(SavePolicy::Propagate);

        let err = svc.chat("hello", None, true).await.unwrap_err();
        assert!(matches!(err, ChatError::Storage(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal_but_user_turn_kept() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::failing(calls));

        let err = svc.chat("hello", Some("c".to_string()), true).await.unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));
        assert!(err.to_string().contains("upstream unavailable"));

        let rows = svc.history(Some("c"), 200).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_two_exchanges_same_conversation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls));

        svc.chat("one", Some("x".to_string()), true).await.unwrap();
        svc.chat("two", Some("x".to_string()), true).await.unwrap();

        let rows = svc.history(Some("x"), 200).await.unwrap();
        let roles: Vec<Role> = rows.iter().map(|r| r.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Bot, Role::User, Role::Bot]);
        assert!(rows.windows(2).all(|w| w[0].id < w[1].id));

        let convs = svc.conversations(100).await.unwrap();
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].count, 4);
        assert_eq!(convs[0].last_message, "echo: two");
    }

    #[tokio::test]
    async fn test_clear_history_passthrough() {
        let calls = Arc::new(AtomicUsize::new(0));
        let svc = service(MemoryRepo::default(), EchoProvider::ok(calls));

        svc.chat("a", Some("x".to_string()), true).await.unwrap();
        svc.chat("b", Some("y".to_string()), true).await.unwrap();

        assert_eq!(svc.clear_history(Some("x")).await.unwrap(), 2);
        assert_eq!(svc.clear_history(None).await.unwrap(), 2);
        assert_eq!(svc.clear_history(None).await.unwrap(), 0);
    }
}
