//! Chat persistence abstractions and orchestration.
//!
//! - `MessageRepository`: the message store port
//! - `validation`: inbound message checks and conversation id assignment
//! - `ChatService`: validate -> persist -> reply -> persist

pub mod repository;
pub mod service;
pub mod validation;
