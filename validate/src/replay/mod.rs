//! Replay engine for drive traces
//!
//! Provides timing simulation for replaying recorded fixes at various speeds.

pub mod clock;

pub use clock::VirtualClock;
