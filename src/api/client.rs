//! reqwest client for the moltbook REST API.
//!
//! Construction is the one place in the crate that handles the plaintext
//! API key: it is folded into a cached `Bearer` header value and never
//! stored or logged beyond that. The base URL defaults to the `www` host;
//! redirects off the bare host drop the Authorization header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::scrub::sanitize_api_error;
use crate::api::traits::MoltbookApi;
use crate::api::types::Post;
use crate::error::ApiError;
use crate::security::credentials::ApiKey;
use crate::settings::Settings;

const AGENT: &str = concat!("moltgate/", env!("CARGO_PKG_VERSION"));
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

pub struct MoltbookClient {
    client: Client,
    base_url: String,
    /// Pre-computed `Bearer <key>` header value.
    cached_auth: String,
}

// ─── Wire bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    #[serde(default)]
    posts: Vec<Post>,
}

/// `GET /posts/{id}` wraps the post on newer servers and returns it bare
/// on older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PostEnvelope {
    Wrapped { post: Post },
    Bare(Post),
}

impl PostEnvelope {
    fn into_post(self) -> Post {
        match self {
            PostEnvelope::Wrapped { post } | PostEnvelope::Bare(post) => post,
        }
    }
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePostBody<'a> {
    submolt: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ─── Client ─────────────────────────────────────────────────────────────────

impl MoltbookClient {
    pub fn new(api_key: &ApiKey, settings: &Settings) -> Self {
        Self {
            cached_auth: format!("Bearer {}", api_key.expose()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(settings.request_timeout)
                .connect_timeout(settings.connect_timeout)
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        tracing::debug!(%path, "GET");
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header(AUTHORIZATION, &self.cached_auth)
            .header(USER_AGENT, AGENT)
            .query(query)
            .send()
            .await?;
        Self::parse_response(path, response).await
    }

    fn post_builder(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .header(AUTHORIZATION, &self.cached_auth)
            .header(USER_AGENT, AGENT)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        tracing::debug!(%path, "POST");
        let response = self.post_builder(path).json(body).send().await?;
        Self::parse_response(path, response).await
    }

    async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        tracing::debug!(%path, "POST");
        let response = self.post_builder(path).send().await?;
        Self::parse_response(path, response).await
    }

    /// Maps the well-known statuses to typed errors; anything else ≥ 400
    /// surfaces the body's `error` field, scrubbed and truncated.
    async fn parse_response(path: &str, response: Response) -> Result<Value, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(ApiError::RateLimited { retry_after_secs });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or(body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: sanitize_api_error(&message),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MoltbookApi for MoltbookClient {
    async fn feed(&self, sort: &str, limit: u32) -> Result<Vec<Post>, ApiError> {
        let value = self
            .get(
                "/posts",
                &[("sort", sort.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        let envelope: FeedEnvelope = serde_json::from_value(value)?;
        Ok(envelope.posts)
    }

    async fn submolt_posts(&self, name: &str, limit: u32) -> Result<Vec<Post>, ApiError> {
        let value = self
            .get(&format!("/submolts/{name}"), &[("limit", limit.to_string())])
            .await?;
        let envelope: FeedEnvelope = serde_json::from_value(value)?;
        Ok(envelope.posts)
    }

    async fn fetch_post(&self, post_id: &str) -> Result<Post, ApiError> {
        let value = self.get(&format!("/posts/{post_id}"), &[]).await?;
        let envelope: PostEnvelope = serde_json::from_value(value)?;
        Ok(envelope.into_post())
    }

    async fn upvote(&self, post_id: &str) -> Result<Value, ApiError> {
        self.post_empty(&format!("/posts/{post_id}/upvote")).await
    }

    async fn comment(&self, post_id: &str, content: &str) -> Result<Value, ApiError> {
        self.post_json(&format!("/posts/{post_id}/comments"), &CommentBody { content })
            .await
    }

    async fn create_post(
        &self,
        submolt: &str,
        title: &str,
        content: Option<&str>,
        url: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.post_json(
            "/posts",
            &CreatePostBody {
                submolt,
                title,
                content,
                url,
            },
        )
        .await
    }

    async fn agent_status(&self) -> Result<Value, ApiError> {
        self.get("/agents/status", &[]).await
    }
}
