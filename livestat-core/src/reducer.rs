//! Pure mapping from a feed event to a state delta.
//!
//! The receive instant is passed in rather than read from the clock, so
//! replaying the same stamped event sequence always yields the same deltas.

use crate::events::FeedEvent;
use crate::store::{Change, Delta};
use time::OffsetDateTime;

/// Reduce one event to the delta it causes.
///
/// Unsupported event kinds reduce to [`Change::Ignored`].
pub fn reduce(event: FeedEvent, received_at: OffsetDateTime) -> Delta {
    let change = match event {
        FeedEvent::Connect { viewers } => Change::SessionStarted { viewers },
        FeedEvent::ViewerUpdate { viewers } => Change::Viewers(viewers),
        FeedEvent::Comment { author, text } => Change::Comment { author, text },
        FeedEvent::Follow { .. } => Change::Follows(1),
        FeedEvent::Like { count, .. } => Change::Likes(count),
        FeedEvent::Share { .. } => Change::Shares(1),
        FeedEvent::Disconnect => Change::SessionEnded,
        FeedEvent::Unsupported => Change::Ignored,
    };
    Delta::new(received_at, change)
}
