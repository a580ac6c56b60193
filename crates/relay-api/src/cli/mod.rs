//! CLI command definitions for the `chat-relay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod history;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use relay_core::chat::repository::{DEFAULT_CONVERSATIONS_LIMIT, DEFAULT_HISTORY_LIMIT};

/// Relay chat messages to a language model and keep the history.
#[derive(Parser)]
#[command(name = "chat-relay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Host to bind to. Defaults to `[server] host` from config.toml.
        #[arg(long, env = "CHAT_RELAY_HOST")]
        host: Option<String>,

        /// Port to listen on. Defaults to `[server] port` from config.toml.
        #[arg(short, long, env = "CHAT_RELAY_PORT")]
        port: Option<u16>,
    },

    /// List conversations, most recently active first.
    #[command(alias = "ls")]
    Conversations {
        /// Maximum number of conversations to show.
        #[arg(short, long, default_value_t = DEFAULT_CONVERSATIONS_LIMIT)]
        limit: u32,
    },

    /// Show stored messages, oldest first.
    History {
        /// Only show this conversation.
        #[arg(short, long)]
        conversation: Option<String>,

        /// Maximum number of messages to show.
        #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },

    /// Delete stored messages.
    Clear {
        /// Only delete this conversation.
        #[arg(short, long)]
        conversation: Option<String>,

        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show database location, message count, and provider.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Default log filter for a verbosity level. `RUST_LOG` overrides it.
pub fn default_log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn,relay_api=info",
        1 => "info,relay_core=debug,relay_infra=debug,relay_api=debug",
        _ => "trace",
    }
}
