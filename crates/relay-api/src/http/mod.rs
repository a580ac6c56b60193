//! HTTP layer for the chat relay.
//!
//! Axum router with CORS and request tracing. No authentication.

pub mod error;
pub mod handlers;
pub mod router;
