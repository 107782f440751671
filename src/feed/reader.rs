//! Read-side of the feed: fetch posts, scan every untrusted field, and
//! hand back summaries that carry their scan verdicts with them.
//!
//! Reading never consults the permission mode; it is the always-allowed
//! category. What it must never do is hand feed text onward without the
//! scan riding alongside.

use std::sync::Arc;

use serde::Serialize;

use crate::api::MoltbookApi;
use crate::api::types::Post;
use crate::error::Result;
use crate::security::sanitizer::{ContentSanitizer, ScanResult};

/// One post, summarized for consumption. `summary` is display text; the
/// scan's `original_text` keeps the exact bytes that were inspected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub author_name: String,
    pub author_id: String,
    pub author_karma: i64,
    pub score: i64,
    pub comment_count: u64,
    pub url: Option<String>,
    pub submolt: Option<String>,
    pub scan: ScanResult,
}

pub struct FeedReader {
    api: Arc<dyn MoltbookApi>,
    sanitizer: ContentSanitizer,
    max_summary_chars: usize,
}

impl FeedReader {
    pub fn new(api: Arc<dyn MoltbookApi>, max_summary_chars: usize) -> Self {
        Self {
            api,
            sanitizer: ContentSanitizer::new(),
            max_summary_chars,
        }
    }

    pub async fn read_feed(&self, sort: &str, limit: u32) -> Result<Vec<PostSummary>> {
        let posts = self.api.feed(sort, limit).await?;
        Ok(self.summarize_all(posts))
    }

    pub async fn read_submolt(&self, name: &str, limit: u32) -> Result<Vec<PostSummary>> {
        let posts = self.api.submolt_posts(name, limit).await?;
        Ok(self.summarize_all(posts))
    }

    /// Full view of a single post. The body is kept whole; only listings
    /// truncate.
    pub async fn read_post(&self, post_id: &str) -> Result<PostSummary> {
        let post = self.api.fetch_post(post_id).await?;
        Ok(self.summarize(post, false))
    }

    fn summarize_all(&self, posts: Vec<Post>) -> Vec<PostSummary> {
        let summaries: Vec<PostSummary> = posts
            .into_iter()
            .map(|post| self.summarize(post, true))
            .collect();
        let flagged = summaries.iter().filter(|s| s.scan.flagged).count();
        if flagged > 0 {
            tracing::warn!(
                flagged,
                total = summaries.len(),
                "feed contains posts with suspicious patterns"
            );
        }
        summaries
    }

    fn summarize(&self, post: Post, truncate: bool) -> PostSummary {
        // Title and body are scanned as one document so a pattern split
        // across neither field alone is still one post-level verdict.
        let scan = self
            .sanitizer
            .scan(&format!("{}\n\n{}", post.title, post.content));

        let summary = if truncate {
            preview(&post.content, self.max_summary_chars)
        } else {
            post.content.clone()
        };

        let score = post.score();
        PostSummary {
            id: post.id,
            title: post.title,
            summary,
            author_name: post.author.name,
            author_id: post.author.id,
            author_karma: post.author.karma,
            score,
            comment_count: post.comment_count,
            url: post.url,
            submolt: post.submolt,
            scan,
        }
    }
}

/// Flattens whitespace and cuts to `max_chars` characters, never mid
/// character.
fn preview(content: &str, max_chars: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
