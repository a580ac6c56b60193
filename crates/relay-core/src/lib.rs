//! Business logic and port definitions for the chat relay.
//!
//! This crate defines the traits (`MessageRepository`, `ReplyProvider`)
//! that the infrastructure layer implements, plus the `ChatService` that
//! orchestrates a chat exchange. It depends only on `relay-types` --
//! never on `relay-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
