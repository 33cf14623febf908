//! State deltas produced by the reducer.

use compact_str::CompactString;
use time::OffsetDateTime;

/// An immutable description of one state change, derived from one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    /// When the originating event was received. Becomes `last_update`.
    pub at: OffsetDateTime,
    pub change: Change,
}

/// The field-level effect of a [`Delta`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Overwrite the viewer count and mark the session live.
    SessionStarted { viewers: u64 },
    /// Overwrite the viewer count.
    Viewers(u64),
    /// Accumulate likes.
    Likes(u64),
    /// Accumulate follows.
    Follows(u64),
    /// Accumulate shares.
    Shares(u64),
    /// Bounded FIFO insert into the recent comments.
    Comment { author: CompactString, text: String },
    /// Mark the session no longer live. Counters are untouched.
    SessionEnded,
    /// Nothing to apply.
    Ignored,
}

impl Delta {
    pub fn new(at: OffsetDateTime, change: Change) -> Self {
        Self { at, change }
    }

    /// `true` if applying this delta would leave the state untouched.
    pub fn is_noop(&self) -> bool {
        matches!(self.change, Change::Ignored)
    }
}
