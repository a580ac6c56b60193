//! System status command.

use anyhow::Result;
use console::style;

use relay_core::chat::repository::MessageRepository;

use crate::state::AppState;

/// Display database location, message count, and provider settings.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let messages = state.chat_service.repo().count_messages().await?;
    let provider = state.chat_service.provider();
    let server = &state.config.server;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database_url": state.database_url,
            "messages": messages,
            "provider": {
                "name": provider.name(),
                "model": provider.model(),
                "base_url": state.config.provider.base_url,
            },
            "server": {
                "host": server.host,
                "port": server.port,
                "allowed_origins": server.allowed_origins,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} chat-relay v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!("  Database: {}", style(&state.database_url).dim());
    println!("  Messages: {}", style(messages).bold());
    println!();

    println!("  {}", style("── Provider ──").dim());
    println!("  Name:     {}", style(provider.name()).cyan());
    println!("  Model:    {}", style(provider.model()).cyan());
    println!("  Endpoint: {}", style(&state.config.provider.base_url).dim());
    println!();

    println!("  {}", style("── Server ──").dim());
    println!("  Listen:   {}:{}", server.host, server.port);
    if server.allowed_origins.is_empty() {
        println!("  CORS:     {}", style("any origin").yellow());
    } else {
        println!("  CORS:     {}", server.allowed_origins.join(", "));
    }
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!();

    Ok(())
}
