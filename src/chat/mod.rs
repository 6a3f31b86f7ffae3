//! Conversation logic: context assembly and the exchange coordinator

pub mod context;
pub mod service;

pub use context::{build_context, compose_prompt, format_context, MAX_CONTEXT_MESSAGES, MODEL_LABEL};
pub use service::{ChatService, Exchange, ExchangeOutcome};
