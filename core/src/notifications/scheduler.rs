//! Two-stage turn notification scheduler
//!
//! Fed once per location fix with the upcoming maneuver and the remaining
//! distance to it. Emits at most one notification per call and at most two
//! per maneuver.

use turnsound_types::{LengthUnits, TurnItem, TurnNotification};

use super::progress::NotificationProgress;
use crate::settings::{Settings, SettingsProvider};

/// Seconds of travel the second notification is started ahead of the turn.
///
/// Covers launching the speech engine and pronouncing the phrase.
pub const START_BEFORE_SECONDS: u32 = 5;

/// Lower bound of the lead distance
pub const MIN_START_BEFORE_METERS: u32 = 10;

/// Upper bound of the lead distance. Also the distance under which a
/// maneuver is too close for a first notification.
pub const MAX_START_BEFORE_METERS: u32 = 100;

/// Distance before the turn at which the second notification starts:
/// `START_BEFORE_SECONDS` of travel, clamped to
/// `[MIN_START_BEFORE_METERS, MAX_START_BEFORE_METERS]`.
pub fn lead_distance_meters(speed_meters_per_second: f64) -> u32 {
    debug_assert!(speed_meters_per_second >= 0.0);
    let start_before_meters = (speed_meters_per_second * f64::from(START_BEFORE_SECONDS)) as u32;
    start_before_meters.clamp(MIN_START_BEFORE_METERS, MAX_START_BEFORE_METERS)
}

/// Decides when to pronounce turn notifications.
///
/// Not synchronized: one instance belongs to one navigation loop. Separate
/// routes use separate instances.
#[derive(Debug, Clone)]
pub struct TurnNotificationScheduler<S = Settings> {
    enabled: bool,
    speed_meters_per_second: f64,
    settings: S,

    /// Maneuver the current progress refers to
    next_turn_index: u32,
    progress: NotificationProgress,
}

impl Default for TurnNotificationScheduler<Settings> {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl<S: SettingsProvider> TurnNotificationScheduler<S> {
    /// Create a disabled scheduler at rest.
    pub fn new(settings: S) -> Self {
        debug_assert!(settings.is_valid(), "scheduler created with invalid sound settings");
        Self {
            enabled: false,
            speed_meters_per_second: 0.0,
            settings,
            next_turn_index: 0,
            progress: NotificationProgress::Nothing,
        }
    }

    /// Recompute the notifications for the current location.
    ///
    /// `notifications` is cleared and receives zero or one entry.
    pub fn update_following_info(
        &mut self,
        notifications: &mut Vec<TurnNotification>,
        turn: &TurnItem,
        distance_to_turn_meters: f64,
    ) {
        notifications.clear();

        if !self.enabled {
            return;
        }

        if self.next_turn_index != turn.index {
            tracing::debug!(
                from = self.next_turn_index,
                to = turn.index,
                "New maneuver, notification progress reset"
            );
            self.progress = NotificationProgress::Nothing;
            self.next_turn_index = turn.index;
        }

        let lead_meters = lead_distance_meters(self.speed_meters_per_second);

        match self.progress {
            NotificationProgress::Nothing => self.handle_nothing_pronounced(
                notifications,
                turn,
                distance_to_turn_meters,
                lead_meters,
            ),
            NotificationProgress::First => {
                if distance_to_turn_meters < f64::from(lead_meters) {
                    notifications.push(self.notification(0, turn));
                    self.advance(NotificationProgress::Second, turn, distance_to_turn_meters);
                }
            }
            NotificationProgress::Second => {}
        }
    }

    fn handle_nothing_pronounced(
        &mut self,
        notifications: &mut Vec<TurnNotification>,
        turn: &TurnItem,
        distance_to_turn_meters: f64,
        lead_meters: u32,
    ) {
        if distance_to_turn_meters <= f64::from(MAX_START_BEFORE_METERS) {
            // Too close to say "in N meters": this turn follows shortly after
            // the previous one. Only the second notification remains.
            self.advance(NotificationProgress::First, turn, distance_to_turn_meters);
            return;
        }

        let speed_units_per_second = self
            .settings
            .convert_meters_per_second_to_units_per_second(self.speed_meters_per_second);
        let notification_distance_units =
            self.settings.compute_turn_distance(speed_units_per_second);
        // Whole meters, like the lead distance
        let notification_distance_meters = (self
            .settings
            .convert_units_to_meters(notification_distance_units)
            + f64::from(lead_meters)) as u32;

        if distance_to_turn_meters < f64::from(notification_distance_meters) {
            let distance_to_pronounce = self
                .settings
                .round_by_preset_sounded_distances_units(notification_distance_units);
            notifications.push(self.notification(distance_to_pronounce, turn));
            self.advance(NotificationProgress::First, turn, distance_to_turn_meters);
        }
    }

    fn advance(&mut self, to: NotificationProgress, turn: &TurnItem, distance_to_turn_meters: f64) {
        tracing::debug!(
            turn_index = turn.index,
            from = %self.progress,
            to = %to,
            distance_to_turn_meters,
            speed_meters_per_second = self.speed_meters_per_second,
            "Turn notification progress"
        );
        self.progress = to;
    }

    fn notification(&self, distance_units: u32, turn: &TurnItem) -> TurnNotification {
        TurnNotification::new(
            distance_units,
            turn.exit_num,
            false,
            turn.turn,
            self.settings.length_units(),
        )
    }

    /// Turn notifications on or off. Switching on from off starts clean.
    pub fn enable(&mut self, enable: bool) {
        if enable && !self.enabled {
            self.reset();
        }
        self.enabled = enable;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Store the current speed. Negative (bad GPS fix) and NaN become zero.
    pub fn set_speed_meters_per_second(&mut self, speed: f64) {
        self.speed_meters_per_second = speed.max(0.0);
    }

    pub fn speed_meters_per_second(&self) -> f64 {
        self.speed_meters_per_second
    }

    /// Replace the settings. The caller must pass validated settings.
    pub fn set_settings(&mut self, settings: S) {
        debug_assert!(settings.is_valid(), "invalid sound settings");
        self.settings = settings;
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn length_units(&self) -> LengthUnits {
        self.settings.length_units()
    }

    /// Forget all progress, whether or not the scheduler is enabled.
    pub fn reset(&mut self) {
        self.progress = NotificationProgress::Nothing;
        self.next_turn_index = 0;
    }

    pub fn progress(&self) -> NotificationProgress {
        self.progress
    }

    pub fn next_turn_index(&self) -> u32 {
        self.next_turn_index
    }
}

impl TurnNotificationScheduler<Settings> {
    /// Switch to the built-in preset for `units`, dropping custom settings.
    pub fn set_length_units(&mut self, units: LengthUnits) {
        self.set_settings(Settings::for_units(units));
    }
}
