//! Test utilities for gemini-caller
//!
//! Scripted provider and temporary storage helpers shared by unit tests.

use crate::providers::{Provider, ProviderError};
use crate::storage::SqliteStorage;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a storage instance in a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the storage is used.
pub fn temp_storage() -> (SqliteStorage, TempDir) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let storage =
        SqliteStorage::new_with_path(dir.path().join("history.db")).expect("create storage");
    (storage, dir)
}

/// Provider returning a fixed answer and recording every prompt it receives
pub struct ScriptedProvider {
    answer: std::result::Result<String, ProviderError>,
    prompts: Mutex<Vec<String>>,
    observe_db: Option<PathBuf>,
    purge_db: Option<PathBuf>,
    chats_during_call: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    /// Answer every call with a 2xx body
    pub fn replying(body: &str) -> Self {
        Self::with_answer(Ok(body.to_string()))
    }

    /// Answer every call with the given error
    pub fn failing(error: ProviderError) -> Self {
        Self::with_answer(Err(error))
    }

    fn with_answer(answer: std::result::Result<String, ProviderError>) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
            observe_db: None,
            purge_db: None,
            chats_during_call: Mutex::new(Vec::new()),
        }
    }

    /// Count the chats in this database at the moment of each call
    pub fn observing(mut self, db_path: PathBuf) -> Self {
        self.observe_db = Some(db_path);
        self
    }

    /// Delete every chat in this database while the call is in flight
    pub fn deleting_chats(mut self, db_path: PathBuf) -> Self {
        self.purge_db = Some(db_path);
        self
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Chat counts recorded by [`ScriptedProvider::observing`]
    pub fn chats_during_call(&self) -> Vec<usize> {
        self.chats_during_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate_content(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(path) = &self.observe_db {
            let storage = SqliteStorage::new_with_path(path.clone()).unwrap();
            let count = storage.list_chats().unwrap().len();
            self.chats_during_call.lock().unwrap().push(count);
        }
        if let Some(path) = &self.purge_db {
            let storage = SqliteStorage::new_with_path(path.clone()).unwrap();
            for chat in storage.list_chats().unwrap() {
                storage.delete_chat(chat.id).unwrap();
            }
        }
        self.answer.clone()
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

/// Success body in the Gemini response shape
pub fn gemini_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string()
}
