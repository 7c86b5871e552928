//! Turn notification system
//!
//! This module provides:
//! - **Progress**: how much of the two-stage announcement protocol has fired
//!   for the current maneuver
//! - **Scheduler**: decides on every location fix whether to emit the first
//!   ("in 400 meters, turn right") or second ("turn right now") notification
//! - **Follower**: drives a scheduler from location fixes and hands its output
//!   to a [`NotificationSink`]
//!
//! # Lifecycle
//!
//! 1. A new maneuver index arrives → progress resets to `Nothing`
//! 2. Distance drops under the speed-dependent announcement distance → first
//!    notification, progress `First`
//! 3. Distance drops under the lead distance → second notification, progress
//!    `Second`
//! 4. Nothing more until the maneuver index changes

mod follower;
mod progress;
mod scheduler;


pub use follower::{LocationFix, NotificationSink, RouteFollower};
pub use progress::NotificationProgress;
pub use scheduler::{
    MAX_START_BEFORE_METERS, MIN_START_BEFORE_METERS, START_BEFORE_SECONDS,
    TurnNotificationScheduler, lead_distance_meters,
};
