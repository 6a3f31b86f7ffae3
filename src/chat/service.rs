//! Chat exchange coordination
//!
//! [`ChatService`] runs one user turn end to end: validation, chat creation,
//! context assembly, the provider call, and persistence of the outcome.
//! The chat a turn belongs to is always passed in explicitly and handed
//! back in the [`Exchange`], so callers keep their own notion of the
//! "current" chat.

use crate::chat::context::{build_context, compose_prompt};
use crate::error::Result;
use crate::providers::{extract_text, Provider, ProviderError};
use crate::storage::{ChatId, ChatSession, MessageOrder, SqliteStorage, StoredMessage};

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Result of one user turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ExchangeOutcome {
    /// The model replied; the reply was stored
    Reply(String),
    /// The API answered with an error body; an `Error: ...` message was stored
    ApiError(String),
    /// The message was empty; nothing happened
    ValidationError,
    /// Anything else went wrong; nothing was stored
    InternalError(String),
}

impl fmt::Display for ExchangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reply(reply) => write!(f, "{}", reply),
            Self::ApiError(detail) => write!(f, "Error communicating with Gemini API: {}", detail),
            Self::ValidationError => write!(f, "Message cannot be empty"),
            Self::InternalError(detail) => write!(f, "Unexpected error: {}", detail),
        }
    }
}

/// Outcome of a turn together with the chat it ran in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Chat to use for the next turn; `None` if no chat could be resolved
    pub chat_id: Option<ChatId>,
    /// What happened
    pub outcome: ExchangeOutcome,
}

/// Chat service over a conversation store and a remote model
pub struct ChatService {
    storage: SqliteStorage,
    provider: Arc<dyn Provider>,
}

impl ChatService {
    /// Create a service from its collaborators
    pub fn new(storage: SqliteStorage, provider: Arc<dyn Provider>) -> Self {
        Self { storage, provider }
    }

    /// Run one user turn
    ///
    /// With `chat_id == None` a new chat is created before the model is
    /// called. An empty or whitespace-only message is rejected without any
    /// side effect.
    pub async fn exchange(&self, user_message: &str, chat_id: Option<ChatId>) -> Exchange {
        if user_message.trim().is_empty() {
            tracing::warn!("Rejected empty message");
            return Exchange {
                chat_id,
                outcome: ExchangeOutcome::ValidationError,
            };
        }

        let chat_id = match self.ensure_chat(chat_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Could not resolve chat: {:#}", e);
                return Exchange {
                    chat_id: None,
                    outcome: ExchangeOutcome::InternalError(e.to_string()),
                };
            }
        };

        let outcome = self.exchange_in_chat(user_message, chat_id).await;
        Exchange {
            chat_id: Some(chat_id),
            outcome,
        }
    }

    fn ensure_chat(&self, chat_id: Option<ChatId>) -> Result<ChatId> {
        match chat_id {
            Some(id) => {
                if self.storage.chat_exists(id)? {
                    Ok(id)
                } else {
                    Err(crate::error::GeminiCallerError::ChatNotFound(id).into())
                }
            }
            None => {
                let chat = self.storage.create_chat()?;
                tracing::info!("Created chat {}", chat.id);
                Ok(chat.id)
            }
        }
    }

    async fn exchange_in_chat(&self, user_message: &str, chat_id: ChatId) -> ExchangeOutcome {
        let context = match build_context(&self.storage, Some(chat_id)) {
            Ok(context) => context,
            Err(e) => {
                tracing::error!("Failed to build context for chat {}: {:#}", chat_id, e);
                return ExchangeOutcome::InternalError(e.to_string());
            }
        };

        let prompt = compose_prompt(&context, user_message);
        tracing::debug!("Gemini full prompt: {}", prompt);

        match self.provider.generate_content(&prompt).await {
            Ok(body) => {
                let reply = extract_text(&body);
                match self
                    .storage
                    .append_message(chat_id, user_message, Some(&reply))
                {
                    Ok(_) => {
                        tracing::info!(
                            "Stored message in chat {}: user message length={}, response length={}",
                            chat_id,
                            user_message.len(),
                            body.len()
                        );
                        ExchangeOutcome::Reply(reply)
                    }
                    Err(e) => {
                        tracing::error!("Failed to store reply in chat {}: {:#}", chat_id, e);
                        ExchangeOutcome::InternalError(e.to_string())
                    }
                }
            }
            Err(ProviderError::Api { status, body }) => {
                tracing::error!("Error communicating with Gemini API ({}): {}", status, body);
                let stored = format!("Error: {}", body);
                if let Err(e) = self
                    .storage
                    .append_message(chat_id, user_message, Some(&stored))
                {
                    tracing::error!("Could not save error message to database: {:#}", e);
                }
                ExchangeOutcome::ApiError(body)
            }
            Err(e) => {
                tracing::error!("Unexpected error: {}", e);
                ExchangeOutcome::InternalError(e.to_string())
            }
        }
    }

    /// Resolve a request to switch chats
    ///
    /// Returns `requested` when that chat exists; otherwise logs a warning
    /// and returns `current` unchanged.
    pub fn switch_chat(&self, current: Option<ChatId>, requested: ChatId) -> Option<ChatId> {
        match self.storage.chat_exists(requested) {
            Ok(true) => {
                tracing::info!("Switched to chat with id: {}", requested);
                Some(requested)
            }
            Ok(false) => {
                tracing::warn!("Attempted to switch to non-existent chat: {}", requested);
                current
            }
            Err(e) => {
                tracing::warn!("Could not switch to chat {}: {:#}", requested, e);
                current
            }
        }
    }

    /// All chats, most recently created first
    pub fn list_chats(&self) -> Result<Vec<ChatSession>> {
        self.storage.list_chats()
    }

    /// Look up one chat
    pub fn chat(&self, chat_id: ChatId) -> Result<Option<ChatSession>> {
        self.storage.get_chat(chat_id)
    }

    /// Every message of a chat, oldest first
    pub fn history(&self, chat_id: ChatId) -> Result<Vec<StoredMessage>> {
        self.storage.messages(chat_id, MessageOrder::Chronological)
    }

    /// Delete a chat and its messages; `false` if it did not exist
    pub fn delete_chat(&self, chat_id: ChatId) -> Result<bool> {
        let deleted = self.storage.delete_chat(chat_id)?;
        if deleted {
            tracing::info!("Deleted chat {}", chat_id);
        }
        Ok(deleted)
    }
}
