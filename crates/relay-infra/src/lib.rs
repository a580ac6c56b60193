//! Infrastructure layer for the chat relay.
//!
//! Contains implementations of the traits defined in `relay-core`: the
//! SQLite message store, the OpenAI-compatible reply provider, and the
//! config file loader.

pub mod config;
pub mod llm;
pub mod sqlite;
