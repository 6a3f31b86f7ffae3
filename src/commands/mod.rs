/*!
Command handlers for the CLI

- `serve`   — Run the chat HTTP API
- `send`    — Send one message and print the reply
- `history` — Browse and delete stored chats

Handlers stay thin: they build the storage and provider from config and
delegate to [`crate::chat::ChatService`].
*/

use crate::chat::{ChatService, ExchangeOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::providers::create_provider;
use crate::storage::{ChatId, SqliteStorage};
use colored::Colorize;
use std::sync::Arc;

pub mod history;

/// Build the chat service described by the configuration
///
/// # Errors
///
/// Returns error if storage cannot be opened or the provider cannot be
/// created (e.g. missing API key)
pub fn build_service(config: &Config) -> Result<ChatService> {
    let storage = SqliteStorage::from_config(&config.storage)?;
    let provider = create_provider(&config.gemini)?;
    Ok(ChatService::new(storage, provider))
}

/// Serve the HTTP API until Ctrl-C
pub async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = Arc::new(build_service(&config)?);
    crate::server::serve(&config.server, service, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

/// Send one message and print the outcome
///
/// An unknown `chat` starts a new chat, matching the HTTP API.
pub async fn send(config: Config, message: String, chat: Option<ChatId>) -> Result<()> {
    let service = build_service(&config)?;
    let current = chat.and_then(|id| service.switch_chat(None, id));
    let exchange = service.exchange(&message, current).await;

    match &exchange.outcome {
        ExchangeOutcome::Reply(reply) => println!("{}", reply),
        other => eprintln!("{}", other.to_string().red()),
    }

    if let Some(id) = exchange.chat_id {
        println!();
        println!(
            "Continue with {}",
            format!("gemini-caller send --chat {} <message>", id).cyan()
        );
    }

    Ok(())
}
