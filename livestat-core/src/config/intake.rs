use crate::store::DEFAULT_COMMENT_CAPACITY;
use crate::utils::backoff::ReconnectPolicy;
use std::num::NonZeroUsize;

/// Intake loop configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Identifier of the live session to attach to.
    pub session_id: String,
    /// How many recent comments the store retains.
    pub comment_capacity: NonZeroUsize,
    /// Backoff between reconnect attempts after the feed drops.
    pub reconnect: ReconnectPolicy,
}

impl IntakeConfig {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            comment_capacity: DEFAULT_COMMENT_CAPACITY,
            reconnect: ReconnectPolicy::default(),
        }
    }
}
