use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a stored chat, assigned by the database
pub type ChatId = i64;

/// A stored conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique identifier for the chat
    pub id: ChatId,
    /// When the chat was created
    pub created_at: DateTime<Utc>,
    /// User text of the first message stored under this chat
    pub first_message: Option<String>,
}

/// One user turn and the model's response to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Unique identifier for the message
    pub id: i64,
    /// Owning chat
    pub chat_id: ChatId,
    /// Text submitted by the user
    pub user_message: String,
    /// Model reply, or an `Error: ...` payload when the API call failed
    pub response: Option<String>,
    /// When the message was stored
    pub timestamp: DateTime<Utc>,
}

/// Ordering used when reading a chat's messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrder {
    /// Oldest first
    Chronological,
    /// Newest first
    NewestFirst,
}
