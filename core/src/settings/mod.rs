//! Sound settings
//!
//! This module provides:
//! - **Provider**: the [`SettingsProvider`] capability the scheduler consumes
//! - **Settings**: the default provider, with metric and imperial presets
//!   and TOML loading
//!
//! A provider answers three questions for the scheduler: how far ahead of a
//! turn the first notification should be spoken at the current speed, how to
//! convert that distance between meters and display units, and which
//! "nice" preset distance to pronounce.

mod definition;
mod error;
mod provider;

pub use definition::{
    IMPERIAL_SOUNDED_DISTANCES_FEET, METRIC_SOUNDED_DISTANCES_METERS, Settings,
};
pub use error::SettingsError;
pub use provider::SettingsProvider;
