//! Reply provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`ReplyProvider`]
//! trait defined in `relay-core`, and a factory ([`create_provider`]) that
//! builds it from the `[provider]` config section.
//!
//! [`ReplyProvider`]: relay_core::llm::provider::ReplyProvider

pub mod openai_compat;

use secrecy::SecretString;

use relay_core::llm::box_provider::BoxReplyProvider;
use relay_types::config::ProviderSettings;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxReplyProvider`] from provider settings.
///
/// A missing API key is not fatal: the relay still starts, storage routes
/// keep working, and chat requests fail at the provider with an
/// authentication error.
pub fn create_provider(settings: &ProviderSettings, api_key: Option<SecretString>) -> BoxReplyProvider {
    let api_key = api_key.unwrap_or_else(|| {
        tracing::warn!(
            env = %settings.api_key_env,
            "no API key configured, chat requests will fail until it is set"
        );
        SecretString::from(String::new())
    });

    let config = openai_compat::config::from_settings(settings, api_key);
    BoxReplyProvider::new(OpenAiCompatibleProvider::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_defaults_to_groq() {
        let settings = ProviderSettings::default();
        let provider = create_provider(&settings, Some(SecretString::from("gsk-test".to_string())));
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_create_provider_custom_base_url() {
        let settings = ProviderSettings {
            base_url: "https://custom.api.example.com/v1".to_string(),
            model: "custom-model".to_string(),
            ..ProviderSettings::default()
        };
        let provider = create_provider(&settings, Some(SecretString::from("key".to_string())));
        assert_eq!(provider.name(), "openai_compat");
        assert_eq!(provider.model(), "custom-model");
    }

    #[test]
    fn test_create_provider_without_key() {
        let provider = create_provider(&ProviderSettings::default(), None);
        assert_eq!(provider.name(), "groq");
    }
}
