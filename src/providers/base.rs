//! Base provider trait and shared types
//!
//! A provider turns one flattened prompt into the raw body of the remote
//! model's answer. Parsing that body is left to the caller so that an
//! unparseable answer can still be stored.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The API answered with a non-success status; `body` is the raw error body
    #[error("API returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request did not finish within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection, TLS or body read failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Remote model abstraction
///
/// Implementations issue exactly one request per call. No retries.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send `prompt` as a single conversation turn
    ///
    /// # Returns
    ///
    /// The raw success body on a 2xx answer
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Api`] for non-2xx answers, and
    /// [`ProviderError::Timeout`] or [`ProviderError::Transport`] when no
    /// answer arrived
    async fn generate_content(&self, prompt: &str) -> std::result::Result<String, ProviderError>;

    /// Model identifier sent to the API
    fn model(&self) -> String;
}
