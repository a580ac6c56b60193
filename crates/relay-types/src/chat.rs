//! Chat message and conversation summary types.
//!
//! A conversation is nothing more than the set of stored messages sharing
//! a `conversation_id`. Messages are append-only: created by a save,
//! read back in `id` order, and only ever removed by an explicit clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Speaker of a single chat turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'bot'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses a role tag, normalizing case and surrounding whitespace.
    ///
    /// `assistant` is accepted as a synonym for `bot`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "bot" | "assistant" => Ok(Role::Bot),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A chat turn as persisted by the message store.
///
/// `id` is assigned by the store and is the authoritative ordering key;
/// `created_at` is informational and may collide between rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: i64,
    pub conversation_id: Option<String>,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Summary of one conversation for sidebar-style listings.
///
/// The `last_*` fields come from the row with the highest `id` in the
/// conversation. Rows without a conversation id never produce a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub last_role: Role,
    pub last_message: String,
    pub last_time: DateTime<Utc>,
    pub count: u64,
}

/// Result of a completed chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub conversation_id: String,
}
