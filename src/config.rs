//! Configuration management for gemini-caller
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{GeminiCallerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API settings
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Conversation storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the API, without a trailing `/models` segment
    ///
    /// Tests point this at a mock server.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier used in the `generateContent` path
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for one `generateContent` call (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Conversation storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the SQLite database; the platform data directory is used when unset
    #[serde(default)]
    pub db_path: Option<String>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GeminiCallerError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| GeminiCallerError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            self.gemini.api_key = api_key;
        }

        if let Ok(api_base) = std::env::var("GEMINI_CALLER_API_BASE") {
            tracing::debug!(api_base = %api_base, "Env override: GEMINI_CALLER_API_BASE");
            self.gemini.api_base = api_base;
        }

        if let Ok(model) = std::env::var("GEMINI_CALLER_MODEL") {
            tracing::debug!(model = %model, "Env override: GEMINI_CALLER_MODEL");
            self.gemini.model = model;
        }

        if let Ok(timeout) = std::env::var("GEMINI_CALLER_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => self.gemini.timeout_seconds = v,
                Err(_) => tracing::warn!("Invalid GEMINI_CALLER_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(host) = std::env::var("GEMINI_CALLER_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("GEMINI_CALLER_PORT") {
            match port.parse::<u16>() {
                Ok(v) => self.server.port = v,
                Err(_) => tracing::warn!("Invalid GEMINI_CALLER_PORT: {}", port),
            }
        }

        if let Ok(db_path) = std::env::var("GEMINI_CALLER_HISTORY_DB") {
            tracing::debug!(db_path = %db_path, "Env override: GEMINI_CALLER_HISTORY_DB");
            self.storage.db_path = Some(db_path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.storage_path {
            self.storage.db_path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// The API key is not checked here: commands that only read history do
    /// not need it. [`crate::providers::GeminiProvider::new`] rejects an
    /// empty key.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(GeminiCallerError::Config("gemini.model cannot be empty".to_string()).into());
        }

        if let Err(e) = url::Url::parse(&self.gemini.api_base) {
            return Err(GeminiCallerError::Config(format!(
                "gemini.api_base is not a valid URL ({}): {}",
                self.gemini.api_base, e
            ))
            .into());
        }

        if self.gemini.timeout_seconds == 0 {
            return Err(GeminiCallerError::Config(
                "gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.port == 0 {
            return Err(
                GeminiCallerError::Config("server.port must be greater than 0".to_string()).into(),
            );
        }

        Ok(())
    }
}
