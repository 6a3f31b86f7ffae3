//! Gemini provider implementation
//!
//! Sends one `generateContent` request per call. The whole conversation is
//! flattened into the text of a single user turn; no structured history is
//! sent.

use crate::config::GeminiConfig;
use crate::error::{GeminiCallerError, Result};
use crate::providers::{Provider, ProviderError};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Reply text used when a success body cannot be parsed
pub const EXTRACTION_FAILED: &str = "Error extracting text";

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

impl GenerateContentRequest {
    /// One conversation turn holding `prompt` as its only part
    pub fn single_turn(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

/// Gemini API provider
///
/// # Examples
///
/// ```
/// use gemini_caller::config::GeminiConfig;
/// use gemini_caller::providers::{GeminiProvider, Provider};
///
/// let config = GeminiConfig {
///     api_key: "test-key".to_string(),
///     ..GeminiConfig::default()
/// };
/// let provider = GeminiProvider::new(config).unwrap();
/// assert_eq!(provider.model(), "gemini-2.0-flash");
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    ///
    /// Returns [`GeminiCallerError::MissingCredentials`] when the API key is
    /// empty, or a provider error if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiCallerError::MissingCredentials("gemini".to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("gemini-caller/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                GeminiCallerError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized Gemini provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Full `generateContent` URL including the `key` query parameter
    fn endpoint(&self) -> Result<url::Url> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );
        let mut url = url::Url::parse(&raw).map_err(|e| {
            GeminiCallerError::Provider(format!("Invalid Gemini endpoint {}: {}", raw, e))
        })?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_content(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let url = self
            .endpoint()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let request = GenerateContentRequest::single_turn(prompt);

        tracing::debug!(
            "Sending Gemini request: model={}, prompt length={}",
            self.model(),
            prompt.len()
        );

        let timeout = self.config.timeout_seconds;
        let map_send_error = |e: reqwest::Error| {
            if e.is_timeout() {
                ProviderError::Timeout(timeout)
            } else {
                // Strip the URL: it carries the API key
                ProviderError::Transport(e.without_url().to_string())
            }
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            tracing::error!("Gemini returned error {}: {}", status, body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

/// Concatenate `candidates[0].content.parts[*].text` from a success body
///
/// Never fails: a body that is not JSON, or that has no first candidate,
/// yields [`EXTRACTION_FAILED`]. Missing `parts` yield an empty string, a part
/// without `text` contributes nothing, and non-string scalar `text` values
/// (including `null`) contribute their JSON rendering.
///
/// # Examples
///
/// ```
/// use gemini_caller::providers::extract_text;
///
/// let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hi"},{"text":" there"}]}}]}"#;
/// assert_eq!(extract_text(body), "Hi there");
/// assert_eq!(extract_text("<html>"), "Error extracting text");
/// ```
pub fn extract_text(body: &str) -> String {
    let root: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Error extracting text from Gemini response: {}", e);
            return EXTRACTION_FAILED.to_string();
        }
    };

    let Some(candidate) = root.get("candidates").and_then(|c| c.get(0)) else {
        tracing::warn!("Error extracting text from Gemini response: no candidates");
        return EXTRACTION_FAILED.to_string();
    };

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    parts
        .into_iter()
        .flatten()
        .filter_map(|part| match part.get("text")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            serde_json::Value::Null => Some("null".to_string()),
            _ => None,
        })
        .collect()
}
