//! Error types for gemini-caller
//!
//! This module defines the infrastructure error types used throughout the
//! application, using `thiserror` for ergonomic error handling. Failures of a
//! single chat exchange are not errors; they are reported as
//! [`crate::chat::ExchangeOutcome`] values.

use thiserror::Error;

/// Main error type for gemini-caller operations
///
/// Covers configuration loading, provider setup, conversation storage and
/// the conversions from the third-party errors we propagate.
#[derive(Error, Debug)]
pub enum GeminiCallerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (client setup, malformed endpoints)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Conversation storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A chat that was asked for does not exist
    #[error("Chat not found: {0}")]
    ChatNotFound(i64),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for gemini-caller operations
///
/// Uses `anyhow::Error` so callers can attach context while the typed
/// [`GeminiCallerError`] stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
