//! Shared domain types for the chat relay.
//!
//! Stored chat messages, conversation summaries, configuration, and the
//! error taxonomy used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
