//! HTTP API handlers.

pub mod stats;
