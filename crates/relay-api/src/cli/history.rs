//! History CLI commands: conversations, history, clear.
//!
//! Rich tables for browsing, JSON with `--json`, and deletion behind a
//! confirmation prompt.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use relay_types::chat::Role;

use crate::state::AppState;

const PREVIEW_CHARS: usize = 60;

/// List conversation summaries, most recently active first.
///
/// # Examples
///
/// ```bash
/// chat-relay conversations
/// chat-relay conversations --limit 10 --json
/// ```
pub async fn list_conversations(state: &AppState, limit: u32, json: bool) -> Result<()> {
    let summaries = state.chat_service.conversations(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start the server with: {}",
            style("i").blue().bold(),
            style("chat-relay serve").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Conversation").fg(Color::White),
        Cell::new("Last active").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
    ]);

    for summary in &summaries {
        table.add_row(vec![
            Cell::new(&summary.conversation_id).fg(Color::Cyan),
            Cell::new(summary.last_time.format("%Y-%m-%d %H:%M").to_string()).fg(Color::White),
            Cell::new(summary.count.to_string()).fg(Color::White),
            Cell::new(format!("{}: {}", summary.last_role, preview(&summary.last_message)))
                .fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(summaries.len()).bold(),
        if summaries.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print stored messages oldest first, optionally for one conversation.
///
/// # Examples
///
/// ```bash
/// chat-relay history
/// chat-relay history --conversation 5f0c... --limit 50
/// ```
pub async fn show_history(
    state: &AppState,
    conversation: Option<&str>,
    limit: u32,
    json: bool,
) -> Result<()> {
    let messages = state.chat_service.history(conversation, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  {} No messages found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!();
    for msg in &messages {
        let label = match msg.role {
            Role::User => style("You").green().bold(),
            Role::Bot => style("Bot").magenta().bold(),
        };
        let conversation = msg.conversation_id.as_deref().unwrap_or("-");
        println!(
            "  {} {} {}",
            style(format!("#{}", msg.id)).dim(),
            label,
            style(format!("[{conversation}] {}", msg.created_at.format("%Y-%m-%d %H:%M:%S"))).dim()
        );
        for line in msg.content.lines() {
            println!("    {line}");
        }
        println!();
    }

    Ok(())
}

/// Delete one conversation, or every message, after confirmation.
pub async fn clear_history(
    state: &AppState,
    conversation: Option<&str>,
    force: bool,
    json: bool,
) -> Result<()> {
    if !force && !json {
        let prompt = match conversation {
            Some(id) => format!("Delete all messages in conversation '{}'?", style(id).red().bold()),
            None => format!("Delete {} stored messages?", style("ALL").red().bold()),
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let deleted = state.chat_service.clear_history(conversation).await?;

    if json {
        let result = serde_json::json!({
            "status": "ok",
            "detail": { "deleted": deleted },
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "  {} Deleted {} message{}",
            style("✓").green().bold(),
            style(deleted).bold(),
            if deleted == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

/// First line of `text`, cut to a fixed number of characters.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > PREVIEW_CHARS || line.len() < text.trim_end().len() {
        let cut: String = line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("hello"), "hello");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(100);
        let out = preview(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn test_preview_marks_multiline() {
        assert_eq!(preview("first\nsecond"), "first...");
    }
}
