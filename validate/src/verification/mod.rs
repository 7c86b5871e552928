//! Checkpoint verification for drive replays
//!
//! Defines expected notification sequences and verifies them against actual
//! scheduler behavior.

pub mod checkpoint;

pub use checkpoint::{CheckpointResult, CheckpointVerifier, Expectations, FiredNotification};
