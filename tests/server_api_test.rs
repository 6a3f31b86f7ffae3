//! HTTP API tests driving the router directly with `tower::ServiceExt::oneshot`

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use wiremock::MockServer;

use common::{mount_error, mount_reply, service_for};
use gemini_caller::server::create_router;

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_chat(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn app_with_reply(text: &str) -> (Router, MockServer, tempfile::TempDir) {
    let server = MockServer::start().await;
    mount_reply(&server, text).await;
    let (service, dir) = service_for(&server);
    (create_router(Arc::new(service)), server, dir)
}

#[tokio::test]
async fn test_health() {
    let (app, _server, _dir) = app_with_reply("unused").await;
    let (status, body) = call(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_send_message_without_chat_creates_one() {
    let (app, _server, _dir) = app_with_reply("Spring Boot is a framework...").await;

    let (status, body) = call(
        &app,
        post_chat(serde_json::json!({"message": "Tell me about Spring Boot"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Spring Boot is a framework...");
    assert_eq!(body["outcome"]["kind"], "reply");
    let chat_id = body["chat_id"].as_i64().expect("chat id");

    let (status, chats) = call(&app, get("/api/chats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chats.as_array().unwrap().len(), 1);
    assert_eq!(chats[0]["id"].as_i64(), Some(chat_id));
    assert_eq!(chats[0]["first_message"], "Tell me about Spring Boot");
}

#[tokio::test]
async fn test_send_message_continues_existing_chat() {
    let (app, _server, _dir) = app_with_reply("ok").await;

    let (_, first) = call(&app, post_chat(serde_json::json!({"message": "one"}))).await;
    let chat_id = first["chat_id"].as_i64().unwrap();

    let (status, second) = call(
        &app,
        post_chat(serde_json::json!({"message": "two", "chat_id": chat_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["chat_id"].as_i64(), Some(chat_id));

    let (status, messages) = call(&app, get(&format!("/api/chats/{}/messages", chat_id))).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<_> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["user_message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["one", "two"]);
}

#[tokio::test]
async fn test_send_message_with_unknown_chat_starts_new_chat() {
    let (app, _server, _dir) = app_with_reply("ok").await;

    let (status, body) = call(
        &app,
        post_chat(serde_json::json!({"message": "hello", "chat_id": 9999})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["chat_id"].as_i64(), Some(9999));
    assert!(body["chat_id"].is_i64());
}

#[tokio::test]
async fn test_send_empty_message_is_unprocessable() {
    let (app, _server, _dir) = app_with_reply("unused").await;

    let (status, body) = call(&app, post_chat(serde_json::json!({"message": "  "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["text"], "Message cannot be empty");
    assert!(body["chat_id"].is_null());

    let (_, chats) = call(&app, get("/api/chats")).await;
    assert!(chats.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_send_message_api_error_is_bad_gateway() {
    let server = MockServer::start().await;
    mount_error(&server, 403, r#"{"error":"forbidden"}"#).await;
    let (service, _dir) = service_for(&server);
    let app = create_router(Arc::new(service));

    let (status, body) = call(&app, post_chat(serde_json::json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["outcome"]["kind"], "api_error");
    assert_eq!(
        body["text"],
        r#"Error communicating with Gemini API: {"error":"forbidden"}"#
    );

    let chat_id = body["chat_id"].as_i64().unwrap();
    let (_, view) = call(&app, get(&format!("/api/chats/{}", chat_id))).await;
    assert_eq!(view["history"][0]["response"], r#"Error: {"error":"forbidden"}"#);
}

#[tokio::test]
async fn test_get_chat_view_and_not_found() {
    let (app, _server, _dir) = app_with_reply("pong").await;
    let (_, sent) = call(&app, post_chat(serde_json::json!({"message": "ping"}))).await;
    let chat_id = sent["chat_id"].as_i64().unwrap();

    let (status, view) = call(&app, get(&format!("/api/chats/{}", chat_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["chat"]["id"].as_i64(), Some(chat_id));
    assert_eq!(view["history"][0]["response"], "pong");

    let (status, body) = call(&app, get("/api/chats/424242")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _) = call(&app, get("/api/chats/424242/messages")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_chat() {
    let (app, _server, _dir) = app_with_reply("ok").await;
    let (_, sent) = call(&app, post_chat(serde_json::json!({"message": "bye"}))).await;
    let chat_id = sent["chat_id"].as_i64().unwrap();

    let delete = |id: i64| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/chats/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = call(&app, delete(chat_id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, delete(chat_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, chats) = call(&app, get("/api/chats")).await;
    assert!(chats.as_array().unwrap().is_empty());
}
