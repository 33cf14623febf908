//! Snapshot store for the live-session aggregate.
//!
//! The aggregate is the only shared mutable resource in the system. It sits
//! behind a single `RwLock` and is reachable through two handles:
//!
//! - [`SnapshotStore`]: the single writer. Not `Clone`, so exactly one task
//!   (the intake loop) can ever apply deltas.
//! - [`SnapshotReader`]: cheap, cloneable, read-only. Handed to every query
//!   handler.
//!
//! The write guard is held for exactly one [`apply`](SnapshotStore::apply)
//! and the read guard for exactly one deep copy, so every snapshot reflects
//! the state between two whole deltas.

mod delta;
mod state;

pub use delta::{Change, Delta};
pub use state::{Comment, DEFAULT_COMMENT_CAPACITY, StateView, unix_seconds};

use state::AggregateState;
use std::num::NonZeroUsize;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;

/// Write handle to the aggregate state.
#[derive(Debug)]
pub struct SnapshotStore {
    inner: Arc<RwLock<AggregateState>>,
    capacity: NonZeroUsize,
}

/// Read-only handle to the aggregate state.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    inner: Arc<RwLock<AggregateState>>,
}

impl SnapshotStore {
    /// Create an empty store retaining at most `capacity` recent comments.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::starting_at(capacity, OffsetDateTime::now_utc())
    }

    /// Create an empty store whose `last_update` starts at `started_at`.
    pub fn starting_at(capacity: NonZeroUsize, started_at: OffsetDateTime) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AggregateState::new(capacity, started_at))),
            capacity,
        }
    }

    /// Maximum number of recent comments retained.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Hand out a read-only handle.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Merge one delta into the state as a single indivisible unit.
    ///
    /// No-op deltas do not take the lock.
    pub async fn apply(&self, delta: Delta) {
        if delta.is_noop() {
            return;
        }
        self.inner.write().await.apply(delta);
    }

    /// Take a consistent copy of the current state.
    pub async fn snapshot(&self) -> StateView {
        self.inner.read().await.view()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_COMMENT_CAPACITY)
    }
}

impl SnapshotReader {
    /// Take a consistent copy of the current state.
    pub async fn snapshot(&self) -> StateView {
        self.inner.read().await.view()
    }
}
