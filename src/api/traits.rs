//! Seam between the trust boundary and the moltbook REST API.
//!
//! The engagement manager and feed reader hold `Arc<dyn MoltbookApi>`, so
//! tests exercise the full permission and approval flow against recording
//! fakes with no network involved.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::Post;
use crate::error::ApiError;

#[async_trait]
pub trait MoltbookApi: Send + Sync {
    /// Main feed. `sort` is passed through to the server (`hot`, `new`, `top`).
    async fn feed(&self, sort: &str, limit: u32) -> Result<Vec<Post>, ApiError>;

    /// Posts from one submolt.
    async fn submolt_posts(&self, name: &str, limit: u32) -> Result<Vec<Post>, ApiError>;

    /// A single post by id.
    async fn fetch_post(&self, post_id: &str) -> Result<Post, ApiError>;

    /// Upvote a post. Returns the raw API result.
    async fn upvote(&self, post_id: &str) -> Result<Value, ApiError>;

    /// Comment on a post. Returns the raw API result.
    async fn comment(&self, post_id: &str, content: &str) -> Result<Value, ApiError>;

    /// Publish a new post. Returns the raw API result.
    async fn create_post(
        &self,
        submolt: &str,
        title: &str,
        content: Option<&str>,
        url: Option<&str>,
    ) -> Result<Value, ApiError>;

    /// Current agent status; used to verify a key at registration.
    async fn agent_status(&self) -> Result<Value, ApiError>;
}
