#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod events;
pub mod feed;
pub mod lifecycle;
pub mod processors;
pub mod reducer;
pub mod store;
pub mod utils;
