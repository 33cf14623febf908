//! Event type definitions.

use compact_str::CompactString;
use livestat_sdk::objects::FeedMessage;

/// A single event delivered by the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// The feed attached to the session.
    Connect {
        /// Viewer count reported at connect time.
        viewers: u64,
    },
    /// Periodic viewer count refresh.
    ViewerUpdate { viewers: u64 },
    Comment { author: CompactString, text: String },
    Follow { author: CompactString },
    /// A like burst; `count` is not always 1.
    Like { author: CompactString, count: u64 },
    Share { author: CompactString },
    /// The live session ended.
    Disconnect,
    /// An event kind this aggregator does not track.
    Unsupported,
}

impl FeedEvent {
    /// Short name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedEvent::Connect { .. } => "connect",
            FeedEvent::ViewerUpdate { .. } => "viewer_update",
            FeedEvent::Comment { .. } => "comment",
            FeedEvent::Follow { .. } => "follow",
            FeedEvent::Like { .. } => "like",
            FeedEvent::Share { .. } => "share",
            FeedEvent::Disconnect => "disconnect",
            FeedEvent::Unsupported => "unsupported",
        }
    }
}

impl From<FeedMessage> for FeedEvent {
    fn from(value: FeedMessage) -> Self {
        match value {
            FeedMessage::Connect { viewer_count } => FeedEvent::Connect {
                viewers: viewer_count,
            },
            FeedMessage::ViewerUpdate { viewer_count } => FeedEvent::ViewerUpdate {
                viewers: viewer_count,
            },
            FeedMessage::Comment { user, comment } => FeedEvent::Comment {
                author: user,
                text: comment,
            },
            FeedMessage::Follow { user } => FeedEvent::Follow { author: user },
            FeedMessage::Like { user, count } => FeedEvent::Like {
                author: user,
                count,
            },
            FeedMessage::Share { user } => FeedEvent::Share { author: user },
            FeedMessage::Disconnect => FeedEvent::Disconnect,
            FeedMessage::Unknown => FeedEvent::Unsupported,
        }
    }
}
