//! Reply provider abstractions.
//!
//! - `ReplyProvider`: RPITIT trait for concrete provider implementations
//! - `BoxReplyProvider`: object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;
