//! Location-fix driver for the scheduler

use serde::{Deserialize, Serialize};
use turnsound_types::{TurnItem, TurnNotification};

use super::scheduler::TurnNotificationScheduler;
use crate::settings::{Settings, SettingsProvider};

/// Trait for systems that consume turn notifications.
/// Implement this for the speech engine, display banners, recorders, etc.
pub trait NotificationSink {
    /// Handle one notification for `turn`.
    fn on_turn_notification(&mut self, turn: &TurnItem, notification: &TurnNotification);

    /// Handle several notifications (default implementation calls
    /// `on_turn_notification` for each)
    fn on_turn_notifications(&mut self, turn: &TurnItem, notifications: &[TurnNotification]) {
        for notification in notifications {
            self.on_turn_notification(turn, notification);
        }
    }
}

impl NotificationSink for Vec<TurnNotification> {
    fn on_turn_notification(&mut self, _turn: &TurnItem, notification: &TurnNotification) {
        self.push(*notification);
    }
}

/// One sample from the navigation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub turn: TurnItem,
    pub distance_to_turn_meters: f64,
    pub speed_meters_per_second: f64,
}

impl LocationFix {
    pub fn new(turn: TurnItem, distance_to_turn_meters: f64, speed_meters_per_second: f64) -> Self {
        Self {
            turn,
            distance_to_turn_meters,
            speed_meters_per_second,
        }
    }
}

/// Feeds location fixes through a scheduler and dispatches its output.
///
/// Keeps a reusable output buffer so steady-state updates do not allocate.
#[derive(Debug, Clone)]
pub struct RouteFollower<S = Settings> {
    scheduler: TurnNotificationScheduler<S>,
    notifications: Vec<TurnNotification>,
}

impl Default for RouteFollower<Settings> {
    fn default() -> Self {
        Self::new(TurnNotificationScheduler::default())
    }
}

impl<S: SettingsProvider> RouteFollower<S> {
    pub fn new(scheduler: TurnNotificationScheduler<S>) -> Self {
        Self {
            scheduler,
            notifications: Vec::with_capacity(1),
        }
    }

    /// Process one fix. Returns how many notifications went to `sink`.
    pub fn on_location_fix(&mut self, fix: &LocationFix, sink: &mut dyn NotificationSink) -> usize {
        self.scheduler
            .set_speed_meters_per_second(fix.speed_meters_per_second);
        self.scheduler.update_following_info(
            &mut self.notifications,
            &fix.turn,
            fix.distance_to_turn_meters,
        );

        sink.on_turn_notifications(&fix.turn, &self.notifications);
        self.notifications.len()
    }

    /// Notifications produced by the last fix
    pub fn last_notifications(&self) -> &[TurnNotification] {
        &self.notifications
    }

    pub fn scheduler(&self) -> &TurnNotificationScheduler<S> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut TurnNotificationScheduler<S> {
        &mut self.scheduler
    }
}
