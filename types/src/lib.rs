//! Shared maneuver and notification types for turnsound
//!
//! This crate contains the serializable value types that pass between the
//! route generator, the notification scheduler (turnsound-core) and the
//! speech/display layers that consume its output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Meters in one international foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

// ─────────────────────────────────────────────────────────────────────────────
// Units
// ─────────────────────────────────────────────────────────────────────────────

/// Unit system used for spoken and displayed distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnits {
    #[default]
    Meters,
    Feet,
}

impl LengthUnits {
    /// Convert a length in meters into this unit.
    pub fn meters_to_units(self, meters: f64) -> f64 {
        match self {
            LengthUnits::Meters => meters,
            LengthUnits::Feet => meters / METERS_PER_FOOT,
        }
    }

    /// Convert a length in this unit back into meters.
    pub fn units_to_meters(self, units: f64) -> f64 {
        match self {
            LengthUnits::Meters => units,
            LengthUnits::Feet => units * METERS_PER_FOOT,
        }
    }

    /// Short label for printed distances ("m", "ft")
    pub fn abbreviation(self) -> &'static str {
        match self {
            LengthUnits::Meters => "m",
            LengthUnits::Feet => "ft",
        }
    }
}

impl fmt::Display for LengthUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnits::Meters => f.write_str("meters"),
            LengthUnits::Feet => f.write_str("feet"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Maneuvers
// ─────────────────────────────────────────────────────────────────────────────

/// Direction classifier attached to every maneuver by the route generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    #[default]
    NoTurn,
    GoStraight,

    TurnRight,
    TurnSharpRight,
    TurnSlightRight,

    TurnLeft,
    TurnSharpLeft,
    TurnSlightLeft,

    UTurnLeft,
    UTurnRight,

    TakeTheExit,

    EnterRoundAbout,
    LeaveRoundAbout,
    StayOnRoundAbout,

    StartAtEndOfStreet,
    ReachedYourDestination,
}

impl TurnDirection {
    pub fn is_left_turn(self) -> bool {
        matches!(
            self,
            TurnDirection::TurnLeft
                | TurnDirection::TurnSharpLeft
                | TurnDirection::TurnSlightLeft
                | TurnDirection::UTurnLeft
        )
    }

    pub fn is_right_turn(self) -> bool {
        matches!(
            self,
            TurnDirection::TurnRight
                | TurnDirection::TurnSharpRight
                | TurnDirection::TurnSlightRight
                | TurnDirection::UTurnRight
        )
    }

    /// Roundabout maneuvers carry a meaningful exit number.
    pub fn is_roundabout(self) -> bool {
        matches!(
            self,
            TurnDirection::EnterRoundAbout
                | TurnDirection::LeaveRoundAbout
                | TurnDirection::StayOnRoundAbout
        )
    }

    /// Stable snake_case name, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            TurnDirection::NoTurn => "no_turn",
            TurnDirection::GoStraight => "go_straight",
            TurnDirection::TurnRight => "turn_right",
            TurnDirection::TurnSharpRight => "turn_sharp_right",
            TurnDirection::TurnSlightRight => "turn_slight_right",
            TurnDirection::TurnLeft => "turn_left",
            TurnDirection::TurnSharpLeft => "turn_sharp_left",
            TurnDirection::TurnSlightLeft => "turn_slight_left",
            TurnDirection::UTurnLeft => "u_turn_left",
            TurnDirection::UTurnRight => "u_turn_right",
            TurnDirection::TakeTheExit => "take_the_exit",
            TurnDirection::EnterRoundAbout => "enter_round_about",
            TurnDirection::LeaveRoundAbout => "leave_round_about",
            TurnDirection::StayOnRoundAbout => "stay_on_round_about",
            TurnDirection::StartAtEndOfStreet => "start_at_end_of_street",
            TurnDirection::ReachedYourDestination => "reached_your_destination",
        }
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single upcoming maneuver on the route.
///
/// Produced by the route generator; the scheduler only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnItem {
    /// Index of the maneuver within the route
    pub index: u32,
    /// Roundabout exit number (0 when not applicable)
    #[serde(default)]
    pub exit_num: u32,
    pub turn: TurnDirection,
}

impl TurnItem {
    pub fn new(index: u32, turn: TurnDirection) -> Self {
        Self {
            index,
            exit_num: 0,
            turn,
        }
    }

    pub fn with_exit(index: u32, exit_num: u32, turn: TurnDirection) -> Self {
        Self {
            index,
            exit_num,
            turn,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// One spoken turn notification handed to the speech layer.
///
/// `distance_units == 0` marks the close-range "turn now" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnNotification {
    /// Rounded announcement distance in `length_units` (0 = now)
    pub distance_units: u32,
    pub exit_num: u32,
    /// Pronounce "then" instead of a distance (chained maneuvers)
    pub use_then_instead_of_distance: bool,
    pub turn_dir: TurnDirection,
    pub length_units: LengthUnits,
}

impl TurnNotification {
    pub fn new(
        distance_units: u32,
        exit_num: u32,
        use_then_instead_of_distance: bool,
        turn_dir: TurnDirection,
        length_units: LengthUnits,
    ) -> Self {
        Self {
            distance_units,
            exit_num,
            use_then_instead_of_distance,
            turn_dir,
            length_units,
        }
    }

    /// A notification about "no turn" carries nothing to say.
    pub fn is_valid(&self) -> bool {
        self.turn_dir != TurnDirection::NoTurn
    }

    /// True for the close-range "turn now" notification
    pub fn is_immediate(&self) -> bool {
        self.distance_units == 0
    }
}

impl fmt::Display for TurnNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TurnNotification [ distance_units == {} ; exit_num == {} ; then == {} ; turn_dir == {} ; length_units == {} ]",
            self.distance_units,
            self.exit_num,
            self.use_then_instead_of_distance,
            self.turn_dir,
            self.length_units,
        )
    }
}
