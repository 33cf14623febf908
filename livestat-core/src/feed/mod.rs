//! Live feed connectors.
//!
//! A [`LiveFeed`] turns a session identifier into a [`FeedStream`] of typed
//! events. The stream ending, or yielding [`FeedError::Transport`], means
//! the connection is gone; the intake loop owns reconnecting.
//!
//! Implementations:
//!
//! - [`WebSocketFeed`]: a relay pushing JSON [`FeedMessage`] frames
//! - [`SimulatedFeed`]: synthetic traffic for demos and dashboards
//!
//! [`FeedMessage`]: livestat_sdk::objects::FeedMessage

pub mod simulated;
pub mod websocket;

pub use simulated::{SimulatedFeed, SimulatorConfig};
pub use websocket::WebSocketFeed;

use crate::events::FeedEvent;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::time::Duration;
use thiserror::Error;

/// Stream of events from one feed connection.
pub type FeedStream = BoxStream<'static, Result<FeedEvent, FeedError>>;

/// Errors a feed connector can report.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connection-level failure. Ends the current connection.
    #[error("feed transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// A single event could not be decoded. The connection stays usable.
    #[error("malformed feed event: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The connect handshake did not finish in time.
    #[error("feed connect timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream refused the session.
    #[error("feed rejected session {session}: {reason}")]
    Rejected { session: String, reason: String },
}

impl FeedError {
    /// `true` if the error only affects one event, not the connection.
    pub fn is_event_scoped(&self) -> bool {
        matches!(self, FeedError::Malformed(_))
    }
}

/// Source of live-session events.
#[async_trait]
pub trait LiveFeed: Send + Sync {
    /// Attach to `session_id` and start receiving events.
    async fn connect(&self, session_id: &str) -> Result<FeedStream, FeedError>;
}
