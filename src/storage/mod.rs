use crate::config::StorageConfig;
use crate::error::{GeminiCallerError, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;

pub mod types;
pub use types::{ChatId, ChatSession, MessageOrder, StoredMessage};

/// Storage backend for chats and their messages
pub struct SqliteStorage {
    db_path: PathBuf,
}

fn storage_error(context: &str, err: impl std::fmt::Display) -> GeminiCallerError {
    GeminiCallerError::Storage(format!("{}: {}", context, err))
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

fn chat_from_row(row: &Row<'_>) -> rusqlite::Result<ChatSession> {
    Ok(ChatSession {
        id: row.get(0)?,
        created_at: millis_to_datetime(row.get(1)?),
        first_message: row.get(2)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.get(0)?,
        chat_id: row.get(1)?,
        user_message: row.get(2)?,
        response: row.get(3)?,
        timestamp: millis_to_datetime(row.get(4)?),
    })
}

impl SqliteStorage {
    /// Create a new storage instance
    ///
    /// Initializes the database file in the user's data directory, unless
    /// `GEMINI_CALLER_HISTORY_DB` points somewhere else.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("GEMINI_CALLER_HISTORY_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "gemini-caller", "gemini-caller").ok_or_else(
            || GeminiCallerError::Storage("Could not determine data directory".into()),
        )?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| storage_error("Failed to create data directory", e))?;

        Self::new_with_path(data_dir.join("history.db"))
    }

    /// Create a new storage instance that uses the specified database path.
    ///
    /// # Examples
    ///
    /// ```
    /// use gemini_caller::storage::SqliteStorage;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let storage = SqliteStorage::new_with_path(dir.path().join("history.db")).unwrap();
    /// assert!(storage.list_chats().unwrap().is_empty());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| storage_error("Failed to create parent directory for database", e))?;
        }

        let storage = Self { db_path };
        storage.init()?;
        Ok(storage)
    }

    /// Open the storage described by the configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match &config.db_path {
            Some(path) => Self::new_with_path(path),
            None => Self::new(),
        }
    }

    /// Path of the underlying database file
    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .map_err(|e| storage_error("Failed to open database", e))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| storage_error("Failed to enable foreign keys", e))?;
        Ok(conn)
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS chats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                first_message TEXT
            );
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL REFERENCES chats(id) ON DELETE CASCADE,
                user_message TEXT NOT NULL,
                response TEXT,
                timestamp INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_chat_timestamp
                ON messages (chat_id, timestamp);",
        )
        .map_err(|e| storage_error("Failed to create tables", e))?;

        Ok(())
    }

    /// Create an empty chat stamped with the current time
    pub fn create_chat(&self) -> Result<ChatSession> {
        let conn = self.connect()?;
        let created_at = Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO chats (created_at, first_message) VALUES (?, NULL)",
            params![created_at],
        )
        .map_err(|e| storage_error("Failed to insert chat", e))?;

        Ok(ChatSession {
            id: conn.last_insert_rowid(),
            created_at: millis_to_datetime(created_at),
            first_message: None,
        })
    }

    /// Check whether a chat exists
    pub fn chat_exists(&self, id: ChatId) -> Result<bool> {
        Ok(self.get_chat(id)?.is_some())
    }

    /// Load a chat by ID
    pub fn get_chat(&self, id: ChatId) -> Result<Option<ChatSession>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT id, created_at, first_message FROM chats WHERE id = ?",
            params![id],
            chat_from_row,
        )
        .optional()
        .map_err(|e| storage_error("Failed to query chat", e).into())
    }

    /// List all chats, most recently created first
    pub fn list_chats(&self) -> Result<Vec<ChatSession>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, created_at, first_message
                FROM chats
                ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| storage_error("Failed to prepare statement", e))?;

        let chats = stmt
            .query_map([], chat_from_row)
            .map_err(|e| storage_error("Failed to query chats", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| storage_error("Failed to read chat row", e))?;

        Ok(chats)
    }

    /// Store a message under an existing chat
    ///
    /// The first message stored under a chat also becomes the chat's
    /// `first_message` label.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiCallerError::ChatNotFound`] when the chat does not exist
    pub fn append_message(
        &self,
        chat_id: ChatId,
        user_message: &str,
        response: Option<&str>,
    ) -> Result<StoredMessage> {
        let mut conn = self.connect()?;
        let timestamp = Utc::now().timestamp_millis();

        let tx = conn
            .transaction()
            .map_err(|e| storage_error("Failed to start transaction", e))?;

        let exists = tx
            .query_row("SELECT 1 FROM chats WHERE id = ?", params![chat_id], |_| {
                Ok(())
            })
            .optional()
            .map_err(|e| storage_error("Failed to query chat", e))?
            .is_some();
        if !exists {
            return Err(GeminiCallerError::ChatNotFound(chat_id).into());
        }

        tx.execute(
            "INSERT INTO messages (chat_id, user_message, response, timestamp)
            VALUES (?, ?, ?, ?)",
            params![chat_id, user_message, response, timestamp],
        )
        .map_err(|e| storage_error("Failed to insert message", e))?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE chats SET first_message = ? WHERE id = ? AND first_message IS NULL",
            params![user_message, chat_id],
        )
        .map_err(|e| storage_error("Failed to update chat label", e))?;

        tx.commit()
            .map_err(|e| storage_error("Failed to commit transaction", e))?;

        Ok(StoredMessage {
            id,
            chat_id,
            user_message: user_message.to_string(),
            response: response.map(str::to_string),
            timestamp: millis_to_datetime(timestamp),
        })
    }

    /// All messages of a chat in the requested order
    ///
    /// Messages sharing a timestamp are ordered by insertion.
    pub fn messages(&self, chat_id: ChatId, order: MessageOrder) -> Result<Vec<StoredMessage>> {
        self.query_messages(chat_id, order, None)
    }

    /// The `limit` most recent messages of a chat, newest first
    pub fn recent_messages(&self, chat_id: ChatId, limit: usize) -> Result<Vec<StoredMessage>> {
        self.query_messages(chat_id, MessageOrder::NewestFirst, Some(limit))
    }

    fn query_messages(
        &self,
        chat_id: ChatId,
        order: MessageOrder,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>> {
        let conn = self.connect()?;

        let direction = match order {
            MessageOrder::Chronological => "ASC",
            MessageOrder::NewestFirst => "DESC",
        };
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let query = format!(
            "SELECT id, chat_id, user_message, response, timestamp
            FROM messages
            WHERE chat_id = ?
            ORDER BY timestamp {dir}, id {dir}
            LIMIT ?",
            dir = direction
        );

        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| storage_error("Failed to prepare statement", e))?;

        let messages = stmt
            .query_map(params![chat_id, limit], message_from_row)
            .map_err(|e| storage_error("Failed to query messages", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| storage_error("Failed to read message row", e))?;

        Ok(messages)
    }

    /// Delete a chat and all of its messages
    ///
    /// Returns `false` when no chat had that ID.
    pub fn delete_chat(&self, id: ChatId) -> Result<bool> {
        let conn = self.connect()?;
        let deleted = conn
            .execute("DELETE FROM chats WHERE id = ?", params![id])
            .map_err(|e| storage_error("Failed to delete chat", e))?;
        Ok(deleted > 0)
    }
}
