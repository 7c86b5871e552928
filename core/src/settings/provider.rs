//! Settings capability consumed by the scheduler

use turnsound_types::LengthUnits;

/// Unit conversion and announcement-distance policy.
///
/// The scheduler holds one implementation and asks it for thresholds on every
/// update. Implementations must be pure: the same inputs give the same answer.
pub trait SettingsProvider {
    /// Convert a speed in meters per second into configured units per second.
    fn convert_meters_per_second_to_units_per_second(&self, speed_meters_per_second: f64) -> f64;

    /// Recommended distance (configured units) at which to pronounce the
    /// first notification when travelling at the given speed.
    fn compute_turn_distance(&self, speed_units_per_second: f64) -> f64;

    /// Convert a distance in configured units into meters.
    fn convert_units_to_meters(&self, distance_units: f64) -> f64;

    /// Snap a distance to the preset of human-friendly announcement distances.
    fn round_by_preset_sounded_distances_units(&self, distance_units: f64) -> u32;

    /// Unit system pronounced in notifications.
    fn length_units(&self) -> LengthUnits;

    /// Whether this configuration may be handed to a scheduler.
    fn is_valid(&self) -> bool;
}
