//! JSON HTTP API over the chat service
//!
//! Routes:
//!
//! - `GET /health`
//! - `GET /api/chats`
//! - `GET /api/chats/:id`, `DELETE /api/chats/:id`
//! - `GET /api/chats/:id/messages`
//! - `POST /api/chat`

pub mod error;
pub mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::chat::ChatService;
use crate::config::ServerConfig;
use crate::error::{GeminiCallerError, Result};

pub use error::{ApiError, ApiResult};
pub use handlers::{ChatView, SendMessageRequest, SendMessageResponse};

/// Build the application router
pub fn create_router(service: Arc<ChatService>) -> Router {
    let api_routes = Router::new()
        .route("/chats", get(handlers::list_chats))
        .route(
            "/chats/:id",
            get(handlers::get_chat).delete(handlers::delete_chat),
        )
        .route("/chats/:id/messages", get(handlers::list_messages))
        .route("/chat", post(handlers::send_message));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the API until `shutdown` resolves
///
/// # Errors
///
/// Returns error if the address is invalid or cannot be bound
pub async fn serve<F>(config: &ServerConfig, service: Arc<ChatService>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            GeminiCallerError::Config(format!(
                "Invalid server address {}:{}: {}",
                config.host, config.port, e
            ))
        })?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
