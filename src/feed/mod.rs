pub mod reader;
pub mod render;

pub use reader::{FeedReader, PostSummary};
pub use render::{render_feed_listing, render_post_detail};
