//! moltbook REST API boundary.
//!
//! Reads and writes both go over bearer-authenticated HTTPS. Retry and
//! backoff are deliberately left to the human operating the tool: a 429
//! surfaces its `Retry-After` value instead of looping.

pub mod client;
pub mod scrub;
pub mod traits;
pub mod types;

pub use client::MoltbookClient;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::MoltbookApi;
pub use types::{Author, Post};
