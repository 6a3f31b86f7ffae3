//! Remote model providers
//!
//! The [`Provider`] trait is the seam between the chat service and the
//! remote model API; [`GeminiProvider`] is the production implementation.

pub mod base;
pub mod gemini;

pub use base::{Provider, ProviderError};
pub use gemini::{extract_text, GeminiProvider, GenerateContentRequest, EXTRACTION_FAILED};

use crate::config::GeminiConfig;
use crate::error::Result;
use std::sync::Arc;

/// Build the configured provider
///
/// # Errors
///
/// Returns error when the provider cannot be constructed, e.g. a missing API key
pub fn create_provider(config: &GeminiConfig) -> Result<Arc<dyn Provider>> {
    Ok(Arc::new(GeminiProvider::new(config.clone())?))
}
