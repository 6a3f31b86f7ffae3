//! HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatService, ExchangeOutcome};
use crate::storage::{ChatId, ChatSession, StoredMessage};

use super::error::{ApiError, ApiResult};

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    /// Message text
    pub message: String,
    /// Chat to continue; unknown or missing starts a new chat
    #[serde(default)]
    pub chat_id: Option<ChatId>,
}

/// Answer of `POST /api/chat`
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    /// Chat the message went to, to be sent back with the next message
    pub chat_id: Option<ChatId>,
    /// Tagged outcome
    pub outcome: ExchangeOutcome,
    /// Human-readable reply or error text
    pub text: String,
}

/// A chat with its full history
#[derive(Debug, Clone, Serialize)]
pub struct ChatView {
    /// Chat metadata
    pub chat: ChatSession,
    /// Messages, oldest first
    pub history: Vec<StoredMessage>,
}

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List chats, newest first
pub async fn list_chats(State(service): State<Arc<ChatService>>) -> ApiResult<Json<Vec<ChatSession>>> {
    Ok(Json(service.list_chats()?))
}

fn require_chat(service: &ChatService, id: ChatId) -> ApiResult<ChatSession> {
    service
        .chat(id)?
        .ok_or_else(|| ApiError::NotFound(format!("chat {}", id)))
}

/// One chat and its history
pub async fn get_chat(
    State(service): State<Arc<ChatService>>,
    Path(id): Path<ChatId>,
) -> ApiResult<Json<ChatView>> {
    let chat = require_chat(&service, id)?;
    let history = service.history(id)?;
    Ok(Json(ChatView { chat, history }))
}

/// History of one chat, oldest first
pub async fn list_messages(
    State(service): State<Arc<ChatService>>,
    Path(id): Path<ChatId>,
) -> ApiResult<Json<Vec<StoredMessage>>> {
    require_chat(&service, id)?;
    Ok(Json(service.history(id)?))
}

/// Delete a chat and its messages
pub async fn delete_chat(
    State(service): State<Arc<ChatService>>,
    Path(id): Path<ChatId>,
) -> ApiResult<StatusCode> {
    if service.delete_chat(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("chat {}", id)))
    }
}

/// Send a message and wait for the model's reply
pub async fn send_message(
    State(service): State<Arc<ChatService>>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let current = req.chat_id.and_then(|id| service.switch_chat(None, id));
    let exchange = service.exchange(&req.message, current).await;

    let status = match exchange.outcome {
        ExchangeOutcome::Reply(_) => StatusCode::OK,
        ExchangeOutcome::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ExchangeOutcome::ApiError(_) => StatusCode::BAD_GATEWAY,
        ExchangeOutcome::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = SendMessageResponse {
        chat_id: exchange.chat_id,
        text: exchange.outcome.to_string(),
        outcome: exchange.outcome,
    };

    (status, Json(body)).into_response()
}
