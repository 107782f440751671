//! Wire types for moltbook read endpoints.
//!
//! Every field is defaulted: the feed is adversarial input, and a post
//! missing half its fields should degrade to empty values, not kill the
//! whole page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub karma: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub submolt: Option<String>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
    #[serde(default)]
    pub comment_count: u64,
}

impl Post {
    /// Net score as shown in feed listings.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_post_fills_defaults() {
        let post: Post = serde_json::from_str(r#"{"id":"p1","title":"hello"}"#).unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.title, "hello");
        assert_eq!(post.content, "");
        assert_eq!(post.author.name, "");
        assert_eq!(post.score(), 0);
        assert_eq!(post.comment_count, 0);
        assert!(post.url.is_none());
        assert!(post.submolt.is_none());
    }

    #[test]
    fn score_subtracts_downvotes() {
        let post: Post =
            serde_json::from_str(r#"{"id":"p1","upvotes":10,"downvotes":3}"#).unwrap();
        assert_eq!(post.score(), 7);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let post: Post =
            serde_json::from_str(r#"{"id":"p1","flair":"meta","nsfw":false}"#).unwrap();
        assert_eq!(post.id, "p1");
    }
}
