//! Command-line interface definition for gemini-caller
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for serving the chat API, sending a single message,
//! and browsing stored conversations.

use clap::{Parser, Subcommand};

/// gemini-caller - chat with Gemini and keep the history
#[derive(Parser, Debug, Clone)]
#[command(name = "gemini-caller")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the conversation database path
    #[arg(long, env = "GEMINI_CALLER_HISTORY_DB")]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the chat HTTP API
    Serve {
        /// Override the bind address from config
        #[arg(long)]
        host: Option<String>,

        /// Override the port from config
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,

        /// Continue an existing chat instead of starting a new one
        #[arg(long)]
        chat: Option<i64>,
    },

    /// Browse stored conversations
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List stored chats, newest first
    List,

    /// Show every message of a chat
    Show {
        /// Chat ID
        id: i64,
    },

    /// Delete a chat and its messages
    Delete {
        /// Chat ID
        id: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            command: Commands::History {
                command: HistoryCommand::List,
            },
        }
    }
}
