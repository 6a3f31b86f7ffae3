use std::sync::Arc;

use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gemini_caller::chat::ChatService;
use gemini_caller::config::GeminiConfig;
use gemini_caller::providers::GeminiProvider;
use gemini_caller::storage::SqliteStorage;

#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-api-key";

#[allow(dead_code)]
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

#[allow(dead_code)]
pub fn create_temp_storage() -> (SqliteStorage, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("history.db");
    let storage =
        SqliteStorage::new_with_path(db_path).expect("failed to create sqlite storage with path");
    (storage, tmp)
}

/// Gemini configuration pointing at a mock server
#[allow(dead_code)]
pub fn gemini_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_key: TEST_API_KEY.to_string(),
        api_base: format!("{}/v1beta", server.uri()),
        timeout_seconds: 5,
        ..GeminiConfig::default()
    }
}

/// Chat service backed by a temp database and a mock Gemini endpoint
#[allow(dead_code)]
pub fn service_for(server: &MockServer) -> (ChatService, TempDir) {
    let (storage, dir) = create_temp_storage();
    let provider = GeminiProvider::new(gemini_config(server)).expect("provider");
    (ChatService::new(storage, Arc::new(provider)), dir)
}

/// Success body in the Gemini response shape
#[allow(dead_code)]
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Answer every generateContent call with `text`
#[allow(dead_code)]
pub async fn mount_reply(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(text)))
        .mount(server)
        .await;
}

/// Answer every generateContent call with an API error
#[allow(dead_code)]
pub async fn mount_error(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json"),
        )
        .mount(server)
        .await;
}
