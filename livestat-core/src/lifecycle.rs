//! Whole-system lifecycle.
//!
//! ```text
//! Uninitialized ──attach──▶ Running ──signal──▶ ShuttingDown ──drained──▶ Stopped
//!       │                                                                   ▲
//!       └──────────────────────────── signal ───────────────────────────────┘
//! ```
//!
//! Transitions only move forward. A shutdown that arrives before the feed
//! ever attached skips `ShuttingDown`, so the query endpoint never reports
//! ready for a service that never ran.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Lifecycle phase. Ordered by progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Uninitialized,
    Running,
    ShuttingDown,
    Stopped,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Uninitialized => write!(f, "uninitialized"),
            Phase::Running => write!(f, "running"),
            Phase::ShuttingDown => write!(f, "shutting_down"),
            Phase::Stopped => write!(f, "stopped"),
        }
    }
}

/// Shared handle to the current [`Phase`].
#[derive(Debug, Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<Phase>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Phase::Uninitialized);
        Self { tx: Arc::new(tx) }
    }

    pub fn phase(&self) -> Phase {
        *self.tx.borrow()
    }

    /// `true` once the feed has attached, until the process stops.
    pub fn is_ready(&self) -> bool {
        matches!(self.phase(), Phase::Running | Phase::ShuttingDown)
    }

    /// Subscribe to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.tx.subscribe()
    }

    /// The feed attached for the first time.
    pub fn mark_running(&self) -> bool {
        self.advance(|phase| (phase == Phase::Uninitialized).then_some(Phase::Running))
    }

    /// A termination signal arrived.
    pub fn begin_shutdown(&self) -> bool {
        self.advance(|phase| match phase {
            Phase::Uninitialized => Some(Phase::Stopped),
            Phase::Running => Some(Phase::ShuttingDown),
            Phase::ShuttingDown | Phase::Stopped => None,
        })
    }

    /// Everything has drained.
    pub fn mark_stopped(&self) -> bool {
        self.advance(|phase| (phase != Phase::Stopped).then_some(Phase::Stopped))
    }

    fn advance(&self, next: impl FnOnce(Phase) -> Option<Phase>) -> bool {
        let mut transition = None;
        let changed = self.tx.send_if_modified(|phase| match next(*phase) {
            Some(to) if to > *phase => {
                transition = Some((*phase, to));
                *phase = to;
                true
            }
            _ => false,
        });
        if let Some((from, to)) = transition {
            info!(%from, %to, "Lifecycle transition");
        }
        changed
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
