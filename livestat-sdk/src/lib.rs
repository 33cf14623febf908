//! Wire types shared by the livestat server, its dashboards, and feed relays.
//!
//! The `client` feature adds a typed HTTP client for the stats endpoint.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
