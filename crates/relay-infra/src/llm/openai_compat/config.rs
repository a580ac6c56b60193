//! Configuration types and per-endpoint defaults for OpenAI-compatible providers.
//!
//! Each endpoint that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the correct
//! base URL and model.

use relay_types::config::ProviderSettings;
use relay_types::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use secrecy::SecretString;

/// Configuration for an OpenAI-compatible completion endpoint.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "groq").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.groq.com/openai/v1").
    pub base_url: String,
    /// API key for authentication. Never logged.
    pub api_key: SecretString,
    /// Model identifier (e.g., "llama-3.1-8b-instant").
    pub model: String,
}

/// Groq default configuration.
///
/// Base URL: `https://api.groq.com/openai/v1`
pub fn groq_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "groq".into(),
        base_url: DEFAULT_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

/// Configuration from the `[provider]` section of `config.toml`.
///
/// The Groq endpoint goes through [`groq_defaults`]; any other base URL is
/// named "openai_compat". A blank model falls back to the default model.
pub fn from_settings(settings: &ProviderSettings, api_key: SecretString) -> OpenAiCompatConfig {
    let model = if settings.model.trim().is_empty() {
        DEFAULT_MODEL
    } else {
        settings.model.as_str()
    };

    if settings.base_url == DEFAULT_BASE_URL {
        return groq_defaults(api_key, model);
    }

    OpenAiCompatConfig {
        provider_name: "openai_compat".into(),
        base_url: settings.base_url.clone(),
        api_key,
        model: model.into(),
    }
}
