//! Observability setup for the chat relay.

pub mod tracing_setup;
