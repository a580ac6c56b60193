//! Reply provider constants and error type.

/// System prompt sent with every reply request unless overridden.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Model identifier used on the default (Groq) endpoint.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// OpenAI-compatible base URL of the default endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Errors from reply provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("provider returned no choices")]
    EmptyResponse,
}
