//! Runtime configuration types.
//!
//! The intake and feed settings live in `livestat-core::config`; this
//! module re-exports them next to the server-only pieces.

pub use livestat_core::config::{FeedConfig, IntakeConfig};

use std::net::SocketAddr;
use std::path::PathBuf;

/// Query endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

/// Static dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub listen: SocketAddr,
    pub dir: PathBuf,
}
