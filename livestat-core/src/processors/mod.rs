//! Event processors.
//!
//! - `EventIntake`: Receives `FeedEvent`s from a live feed, applies the
//!   resulting deltas to the snapshot store

pub mod event_intake;

pub use event_intake::{EventIntake, IntakeError};
