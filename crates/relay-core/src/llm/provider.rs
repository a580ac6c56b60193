//! ReplyProvider trait definition.
//!
//! The core abstraction every completion backend implements. One call
//! maps one user utterance to one reply; no conversation context is sent.

use relay_types::llm::ProviderError;

/// Trait for external completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in relay-infra (e.g., `OpenAiCompatibleProvider`).
pub trait ReplyProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq").
    fn name(&self) -> &str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send `system_prompt` + `user_message` and return the reply text.
    fn get_reply(
        &self,
        user_message: &str,
        system_prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}
