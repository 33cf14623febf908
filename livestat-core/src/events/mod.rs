//! Typed live-session events.
//!
//! Every event kind the platform can push is one variant of [`FeedEvent`].
//! Feed connectors translate their wire format into this enum, and the
//! intake loop is the only consumer.
//!
//! # Event Flow
//!
//! 1. A [`LiveFeed`](crate::feed::LiveFeed) yields `FeedEvent`s
//! 2. `EventIntake` stamps each with its receive time and calls
//!    [`reduce`](crate::reducer::reduce)
//! 3. The resulting [`Delta`](crate::store::Delta) is applied to the
//!    [`SnapshotStore`](crate::store::SnapshotStore)

pub mod types;

pub use types::FeedEvent;
