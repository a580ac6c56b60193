//! Application state wiring the store, provider, and chat service together.
//!
//! AppState holds the concrete service used by both CLI and REST API.
//! `ChatService` is generic over the repository trait; AppState pins it to
//! the SQLite implementation.

use std::path::PathBuf;
use std::sync::Arc;

use relay_core::chat::service::ChatService;
use relay_infra::config::{
    apply_env_overrides, load_api_key, load_relay_config, resolve_data_dir, CORS_ORIGINS_ENV,
};
use relay_infra::llm::create_provider;
use relay_infra::sqlite::message::SqliteMessageRepository;
use relay_infra::sqlite::pool::{database_url, DatabasePool};
use relay_types::config::RelayConfig;

pub type ConcreteChatService = ChatService<SqliteMessageRepository>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
    pub database_url: String,
}

impl AppState {
    /// Initialize the application state: load config, open the DB, wire the service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_relay_config(&data_dir).await;
        let cors_origins = std::env::var(CORS_ORIGINS_ENV).ok();
        let config = apply_env_overrides(config, cors_origins.as_deref());

        let database_url = database_url(std::env::var("DATABASE_URL").ok(), &data_dir);
        let pool = DatabasePool::new(&database_url).await?;
        tracing::debug!(url = %database_url, "Database ready");

        let api_key = load_api_key(&config.provider.api_key_env);
        let provider = create_provider(&config.provider, api_key);

        let chat_service = ChatService::new(SqliteMessageRepository::new(pool), provider)
            .with_system_prompt(config.provider.system_prompt.clone())
            .with_max_message_chars(config.chat.max_message_chars);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            database_url,
        })
    }
}
