#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tempfile::TempDir;

use moltgate::api::MoltbookApi;
use moltgate::api::types::{Author, Post};
use moltgate::error::ApiError;
use moltgate::security::{CredentialStore, EngagementManager, Mode};

pub const TEST_KEY: &str = "moltbook_sk_integration";
pub const TEST_AGENT: &str = "agent-it";

/// In-memory stand-in for the moltbook API. Records every write-shaped
/// call so tests can assert on exactly what reached the network layer.
pub struct RecordingApi {
    calls: Mutex<Vec<String>>,
    posts: Vec<Post>,
    fail_writes: bool,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            posts: Vec::new(),
            fail_writes: false,
        }
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::new()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_writes {
            Err(ApiError::Status {
                status: 503,
                message: "backend unavailable".into(),
            })
        } else {
            Ok(serde_json::json!({"success": true}))
        }
    }
}

#[async_trait::async_trait]
impl MoltbookApi for RecordingApi {
    async fn feed(&self, _sort: &str, _limit: u32) -> Result<Vec<Post>, ApiError> {
        Ok(self.posts.clone())
    }

    async fn submolt_posts(&self, _name: &str, _limit: u32) -> Result<Vec<Post>, ApiError> {
        Ok(self.posts.clone())
    }

    async fn fetch_post(&self, post_id: &str) -> Result<Post, ApiError> {
        self.posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/posts/{post_id}")))
    }

    async fn upvote(&self, post_id: &str) -> Result<Value, ApiError> {
        self.record(format!("upvote:{post_id}"))
    }

    async fn comment(&self, post_id: &str, content: &str) -> Result<Value, ApiError> {
        self.record(format!("comment:{post_id}:{content}"))
    }

    async fn create_post(
        &self,
        submolt: &str,
        title: &str,
        _content: Option<&str>,
        _url: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.record(format!("create_post:{submolt}:{title}"))
    }

    async fn agent_status(&self) -> Result<Value, ApiError> {
        Ok(serde_json::json!({"status": "ok", "agent": {"name": TEST_AGENT}}))
    }
}

/// A credential store in a fresh temp dir, registered and set to `mode`.
/// The `TempDir` must stay alive for the store's lifetime.
pub fn registered_store(mode: Mode) -> (TempDir, CredentialStore) {
    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path());
    store.store(TEST_KEY, TEST_AGENT).unwrap();
    store.set_mode(mode).unwrap();
    (dir, store)
}

/// Full gate wired to a recording API.
pub fn gate(mode: Mode, api: RecordingApi) -> (TempDir, Arc<RecordingApi>, EngagementManager) {
    let (dir, store) = registered_store(mode);
    let api = Arc::new(api);
    let manager = EngagementManager::new(store, Arc::clone(&api) as Arc<dyn MoltbookApi>);
    (dir, api, manager)
}

pub fn sample_post(id: &str, title: &str, content: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        submolt: Some("rustdev".to_string()),
        author: Author {
            id: "author-1".to_string(),
            name: "molty".to_string(),
            karma: 1200,
        },
        upvotes: 12,
        downvotes: 4,
        comment_count: 3,
        ..Post::default()
    }
}
