//! Frame protocol spoken by live-event relays.
//!
//! A relay pushes one JSON text frame per platform event. Frames are
//! internally tagged so the consumer can dispatch on the `"type"` field:
//!
//! ```json
//! {"type":"connect","viewer_count":120}
//! {"type":"comment","user":"ana","comment":"hola"}
//! {"type":"like","user":"ana","count":5}
//! {"type":"disconnect"}
//! ```
//!
//! Event types this version does not know about decode to
//! [`FeedMessage::Unknown`] instead of failing, so relays can add new
//! event kinds without breaking older consumers.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Relay-to-consumer frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// The relay attached to the live session.
    Connect {
        /// Viewer count reported at connect time.
        viewer_count: u64,
    },

    /// Periodic room statistics update.
    ViewerUpdate { viewer_count: u64 },

    Comment {
        user: CompactString,
        comment: String,
    },

    Follow { user: CompactString },

    /// A like burst. One frame may carry several likes.
    Like { user: CompactString, count: u64 },

    Share { user: CompactString },

    /// The live session ended or the relay lost it.
    Disconnect,

    /// Any event type not listed above (gifts, questions, ...).
    #[serde(other)]
    Unknown,
}
