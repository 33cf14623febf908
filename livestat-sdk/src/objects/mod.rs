pub mod feed;
pub mod stats;

pub use feed::FeedMessage;
pub use stats::{CommentEntry, StatsResponse};
