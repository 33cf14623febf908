//! The aggregate state and its read-only view.

use super::delta::{Change, Delta};
use compact_str::CompactString;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use time::OffsetDateTime;

/// Default number of recent comments retained.
pub const DEFAULT_COMMENT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// A comment as retained in the recent-comments window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: CompactString,
    pub text: String,
    pub received_at: OffsetDateTime,
}

/// An immutable, independent copy of the aggregate state at one instant.
///
/// Owns all of its data; nothing in here aliases the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateView {
    pub viewers: u64,
    pub likes: u64,
    pub follows: u64,
    pub shares: u64,
    /// Recent comments, oldest first.
    pub comments: Vec<Comment>,
    pub last_update: OffsetDateTime,
    /// Whether the upstream session is connected.
    pub live: bool,
    /// Number of deltas applied to produce this state.
    pub applied: u64,
}

/// The mutable aggregate. Only reachable through `SnapshotStore`.
#[derive(Debug)]
pub(crate) struct AggregateState {
    viewers: u64,
    likes: u64,
    follows: u64,
    shares: u64,
    comments: VecDeque<Comment>,
    capacity: NonZeroUsize,
    last_update: OffsetDateTime,
    live: bool,
    applied: u64,
}

impl AggregateState {
    pub(crate) fn new(capacity: NonZeroUsize, started_at: OffsetDateTime) -> Self {
        Self {
            viewers: 0,
            likes: 0,
            follows: 0,
            shares: 0,
            comments: VecDeque::with_capacity(capacity.get()),
            capacity,
            last_update: started_at,
            live: false,
            applied: 0,
        }
    }

    /// Merge one delta. Never suspends and never fails, so a caller holding
    /// the write guard applies it as a single unit.
    pub(crate) fn apply(&mut self, delta: Delta) {
        match delta.change {
            Change::Ignored => return,
            Change::SessionStarted { viewers } => {
                self.viewers = viewers;
                self.live = true;
            }
            Change::Viewers(viewers) => self.viewers = viewers,
            Change::Likes(count) => self.likes = self.likes.saturating_add(count),
            Change::Follows(count) => self.follows = self.follows.saturating_add(count),
            Change::Shares(count) => self.shares = self.shares.saturating_add(count),
            Change::Comment { author, text } => {
                if self.comments.len() >= self.capacity.get() {
                    self.comments.pop_front();
                }
                self.comments.push_back(Comment {
                    author,
                    text,
                    received_at: delta.at,
                });
            }
            Change::SessionEnded => self.live = false,
        }

        // Wall clock may step backwards; last_update must not.
        self.last_update = self.last_update.max(delta.at);
        self.applied += 1;
    }

    pub(crate) fn view(&self) -> StateView {
        StateView {
            viewers: self.viewers,
            likes: self.likes,
            follows: self.follows,
            shares: self.shares,
            comments: self.comments.iter().cloned().collect(),
            last_update: self.last_update,
            live: self.live,
            applied: self.applied,
        }
    }
}

/// Unix seconds with a fractional part, as used on the wire.
pub fn unix_seconds(at: OffsetDateTime) -> f64 {
    at.unix_timestamp() as f64 + f64::from(at.nanosecond()) / 1_000_000_000.0
}
