//! Application state shared across all request handlers.

use livestat_core::lifecycle::Lifecycle;
use livestat_core::store::SnapshotReader;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
/// Handlers only ever read; the intake task owns the write handle.
#[derive(Clone)]
pub struct AppState {
    /// Read-only handle to the aggregate.
    pub reader: SnapshotReader,
    /// Readiness gate for the query endpoint.
    pub lifecycle: Lifecycle,
}

impl AppState {
    pub fn new(reader: SnapshotReader, lifecycle: Lifecycle) -> Self {
        Self { reader, lifecycle }
    }
}
