//! gemini-caller - chat with Gemini and keep the history
//!
//! This library persists chats and their messages in SQLite, flattens
//! recent turns into a prompt, and sends one `generateContent` request per
//! user message.
//!
//! # Architecture
//!
//! - `storage`: SQLite conversation store (chats and messages)
//! - `chat`: context assembly and the exchange coordinator
//! - `providers`: remote model abstraction and the Gemini client
//! - `server`: JSON HTTP API
//! - `commands`: CLI command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gemini_caller::chat::ChatService;
//! use gemini_caller::providers::create_provider;
//! use gemini_caller::storage::SqliteStorage;
//! use gemini_caller::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let storage = SqliteStorage::from_config(&config.storage)?;
//!     let service = ChatService::new(storage, create_provider(&config.gemini)?);
//!
//!     let first = service.exchange("Hello!", None).await;
//!     println!("{}", first.outcome);
//!     let second = service.exchange("And again", first.chat_id).await;
//!     println!("{}", second.outcome);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use chat::{ChatService, Exchange, ExchangeOutcome};
pub use config::Config;
pub use error::{GeminiCallerError, Result};

#[cfg(test)]
pub mod test_utils;
