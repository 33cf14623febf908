//! Response body of the stats query endpoint.

use serde::{Deserialize, Serialize};

/// Aggregate live-session statistics as served by `GET /stats`.
///
/// All timestamps are Unix seconds with a fractional part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Most recently reported viewer count.
    pub viewers: u64,
    pub likes: u64,
    pub follows: u64,
    pub shares: u64,
    /// Recent comments, oldest first.
    pub comments: Vec<CommentEntry>,
    /// Time of the most recent applied update.
    pub last_update: f64,
    /// Whether the upstream session is currently connected.
    ///
    /// Older servers do not send this field; it then reads as `false`.
    #[serde(default)]
    pub live: bool,
}

/// A single recent comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEntry {
    /// Display name of the author.
    pub user: String,
    /// Comment text.
    pub comment: String,
    /// When the server received the comment.
    pub timestamp: f64,
}
