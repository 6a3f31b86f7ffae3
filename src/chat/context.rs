//! Conversation context assembly
//!
//! The remote model keeps no state between calls, so recent turns are
//! flattened into a plain-text transcript and prepended to every prompt.

use crate::error::Result;
use crate::storage::{ChatId, SqliteStorage, StoredMessage};

/// Number of most recent messages included in the context
pub const MAX_CONTEXT_MESSAGES: usize = 10;

/// Role label for model replies in the transcript
pub const MODEL_LABEL: &str = "Gemini";

/// Build the transcript of the most recent messages of a chat
///
/// Returns an empty string when there is no chat yet or the chat has no
/// messages. Otherwise the last [`MAX_CONTEXT_MESSAGES`] messages are
/// rendered oldest first by [`format_context`].
///
/// # Errors
///
/// Returns error if the messages cannot be read from storage
pub fn build_context(storage: &SqliteStorage, chat_id: Option<ChatId>) -> Result<String> {
    let Some(chat_id) = chat_id else {
        return Ok(String::new());
    };

    let mut recent = storage.recent_messages(chat_id, MAX_CONTEXT_MESSAGES)?;
    recent.reverse();

    Ok(format_context(&recent))
}

/// Render messages as `User:` / `Gemini:` line pairs separated by blank lines
///
/// A missing response renders as nothing after its label.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use gemini_caller::chat::format_context;
/// use gemini_caller::storage::StoredMessage;
///
/// let msg = StoredMessage {
///     id: 1,
///     chat_id: 1,
///     user_message: "Hi".to_string(),
///     response: Some("Hello!".to_string()),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(format_context(&[msg]), "User: Hi\nGemini: Hello!");
/// ```
pub fn format_context(messages: &[StoredMessage]) -> String {
    messages
        .iter()
        .map(|msg| {
            format!(
                "User: {}\n{}: {}",
                msg.user_message,
                MODEL_LABEL,
                msg.response.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prefix the new user message with the transcript, if there is one
pub fn compose_prompt(context: &str, user_message: &str) -> String {
    if context.is_empty() {
        user_message.to_string()
    } else {
        format!("{}\n\nUser: {}", context, user_message)
    }
}
