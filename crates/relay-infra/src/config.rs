//! Configuration loader for the chat relay.
//!
//! Reads `config.toml` from the data directory (`~/.chat-relay/` by default)
//! and deserializes it into [`RelayConfig`]. Falls back to defaults when the
//! file is missing or malformed. Environment variables are layered on top by
//! [`apply_env_overrides`].

use std::path::{Path, PathBuf};

use relay_types::config::RelayConfig;
use secrecy::SecretString;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHAT_RELAY_DATA_DIR";

/// Environment variable holding a comma-separated CORS origin allow-list.
pub const CORS_ORIGINS_ENV: &str = "CHAT_RELAY_CORS_ORIGINS";

/// Resolve the data directory.
///
/// Uses `CHAT_RELAY_DATA_DIR` if set, otherwise `~/.chat-relay`, and
/// `./.chat-relay` when no home directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chat-relay");
    }

    PathBuf::from(".chat-relay")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RelayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_relay_config(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    }
}

/// Apply environment overrides to a loaded config.
///
/// `cors_origins` is the raw value of `CHAT_RELAY_CORS_ORIGINS`. When it
/// holds at least one non-blank origin it replaces the file's allow-list.
pub fn apply_env_overrides(mut config: RelayConfig, cors_origins: Option<&str>) -> RelayConfig {
    if let Some(raw) = cors_origins {
        let origins = parse_origin_list(raw);
        if !origins.is_empty() {
            config.server.allowed_origins = origins;
        }
    }
    config
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the completion API key from the named environment variable.
///
/// Returns `None` when the variable is unset or blank.
pub fn load_api_key(env_name: &str) -> Option<SecretString> {
    match std::env::var(env_name) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value.trim().to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::config::DEFAULT_MAX_MESSAGE_CHARS;
    use relay_types::llm::DEFAULT_MODEL;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_relay_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_relay_config(tmp.path()).await;
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.chat.max_message_chars, DEFAULT_MAX_MESSAGE_CHARS);
    }

    #[tokio::test]
    async fn load_relay_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[provider]
model = "llama-3.3-70b-versatile"

[server]
port = 9001
allowed_origins = ["http://localhost:5173"]

[chat]
max_message_chars = 500
"#,
        )
        .await
        .unwrap();

        let config = load_relay_config(tmp.path()).await;
        assert_eq!(config.provider.model, "llama-3.3-70b-versatile");
        assert_eq!(config.provider.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.chat.max_message_chars, 500);
    }

    #[tokio::test]
    async fn load_relay_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_relay_config(tmp.path()).await;
        assert_eq!(config.server.port, 8000);
        assert!(config.server.allowed_origins.is_empty());
    }

    #[test]
    fn parse_origin_list_trims_and_drops_blanks() {
        let origins = parse_origin_list(" http://a.test/ ,, https://b.test ,");
        assert_eq!(origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn env_origins_replace_file_origins() {
        let mut config = RelayConfig::default();
        config.server.allowed_origins = vec!["http://file.test".to_string()];

        let config = apply_env_overrides(config, Some("http://env.test"));
        assert_eq!(config.server.allowed_origins, vec!["http://env.test"]);
    }

    #[test]
    fn blank_env_origins_keep_file_origins() {
        let mut config = RelayConfig::default();
        config.server.allowed_origins = vec!["http://file.test".to_string()];

        let config = apply_env_overrides(config, Some(" , "));
        assert_eq!(config.server.allowed_origins, vec!["http://file.test"]);

        let config = apply_env_overrides(config, None);
        assert_eq!(config.server.allowed_origins, vec!["http://file.test"]);
    }

    #[test]
    fn load_api_key_missing_variable() {
        assert!(load_api_key("CHAT_RELAY_TEST_KEY_THAT_IS_NEVER_SET").is_none());
    }
}
