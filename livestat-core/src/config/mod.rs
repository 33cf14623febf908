//! Runtime configuration types.
//!
//! These types represent the validated configuration the core runs with.
//! Loading and parsing the TOML file is handled by the server crate.

mod feed;
mod intake;

pub use feed::FeedConfig;
pub use intake::IntakeConfig;
