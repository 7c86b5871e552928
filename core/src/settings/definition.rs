//! Sound settings definition and presets
//!
//! Settings can be built from a preset or loaded from a TOML file:
//!
//! ```toml
//! length_units = "feet"
//! time_seconds = 25
//! sounded_distances_units = [500, 1000, 2000, 5000]
//! ```
//!
//! Keys missing from the file fall back to the preset for `length_units`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use turnsound_types::LengthUnits;

use super::error::SettingsError;
use super::provider::SettingsProvider;

/// Distances (meters) that may be pronounced in a first notification.
pub const METRIC_SOUNDED_DISTANCES_METERS: [u32; 12] =
    [200, 250, 300, 400, 500, 600, 700, 800, 900, 1000, 1500, 2000];

/// Distances (feet) that may be pronounced in a first notification.
pub const IMPERIAL_SOUNDED_DISTANCES_FEET: [u32; 14] = [
    500, 600, 700, 800, 900, 1000, 1500, 2000, 2500, 3000, 3500, 4000, 4500, 5000,
];

const DEFAULT_TIME_SECONDS: u32 = 20;

/// Validated sound settings and the default [`SettingsProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds of travel ahead of a turn at which the first notification fires
    pub time_seconds: u32,

    // ─── Announcement distance bounds (in `length_units`) ──────────────────
    pub min_distance_units: u32,
    pub max_distance_units: u32,

    /// Ascending list of distances that may be pronounced
    pub sounded_distances_units: Vec<u32>,

    pub length_units: LengthUnits,
}

/// On-disk shape: every key optional, filled from the unit preset.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    length_units: LengthUnits,
    time_seconds: Option<u32>,
    min_distance_units: Option<u32>,
    max_distance_units: Option<u32>,
    sounded_distances_units: Option<Vec<u32>>,
}

impl Settings {
    pub fn new(
        time_seconds: u32,
        min_distance_units: u32,
        max_distance_units: u32,
        sounded_distances_units: Vec<u32>,
        length_units: LengthUnits,
    ) -> Self {
        Self {
            time_seconds,
            min_distance_units,
            max_distance_units,
            sounded_distances_units,
            length_units,
        }
    }

    /// 20 seconds ahead, 200-2000 m
    pub fn metric() -> Self {
        Self::new(
            DEFAULT_TIME_SECONDS,
            200,
            2000,
            METRIC_SOUNDED_DISTANCES_METERS.to_vec(),
            LengthUnits::Meters,
        )
    }

    /// 20 seconds ahead, 500-5000 ft
    pub fn imperial() -> Self {
        Self::new(
            DEFAULT_TIME_SECONDS,
            500,
            5000,
            IMPERIAL_SOUNDED_DISTANCES_FEET.to_vec(),
            LengthUnits::Feet,
        )
    }

    /// Built-in preset for a unit system
    pub fn for_units(units: LengthUnits) -> Self {
        match units {
            LengthUnits::Meters => Self::metric(),
            LengthUnits::Feet => Self::imperial(),
        }
    }

    /// Check the invariants a scheduler relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |reason: &str| SettingsError::Invalid {
            reason: reason.to_string(),
        };

        if self.time_seconds == 0 {
            return Err(invalid("time_seconds must be positive"));
        }
        if self.min_distance_units > self.max_distance_units {
            return Err(SettingsError::Invalid {
                reason: format!(
                    "min_distance_units ({}) exceeds max_distance_units ({})",
                    self.min_distance_units, self.max_distance_units
                ),
            });
        }
        if self.sounded_distances_units.is_empty() {
            return Err(invalid("sounded_distances_units is empty"));
        }
        if !self.sounded_distances_units.is_sorted() {
            return Err(invalid("sounded_distances_units must be in ascending order"));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Self::parse(content, "<inline>")
    }

    /// Load and validate settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            units = %settings.length_units,
            "Loaded sound settings"
        );
        Ok(settings)
    }

    /// Save settings to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::WriteFile {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        std::fs::write(path, content).map_err(|source| SettingsError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str, origin: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile =
            toml::from_str(content).map_err(|source| SettingsError::ParseToml {
                origin: origin.to_string(),
                source,
            })?;

        let preset = Self::for_units(file.length_units);
        let settings = Self {
            time_seconds: file.time_seconds.unwrap_or(preset.time_seconds),
            min_distance_units: file.min_distance_units.unwrap_or(preset.min_distance_units),
            max_distance_units: file.max_distance_units.unwrap_or(preset.max_distance_units),
            sounded_distances_units: file
                .sounded_distances_units
                .unwrap_or(preset.sounded_distances_units),
            length_units: file.length_units,
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::metric()
    }
}

impl SettingsProvider for Settings {
    fn convert_meters_per_second_to_units_per_second(&self, speed_meters_per_second: f64) -> f64 {
        self.length_units.meters_to_units(speed_meters_per_second)
    }

    fn compute_turn_distance(&self, speed_units_per_second: f64) -> f64 {
        debug_assert!(speed_units_per_second >= 0.0);
        let distance = f64::from(self.time_seconds) * speed_units_per_second;
        distance.clamp(
            f64::from(self.min_distance_units),
            f64::from(self.max_distance_units),
        )
    }

    fn convert_units_to_meters(&self, distance_units: f64) -> f64 {
        self.length_units.units_to_meters(distance_units)
    }

    fn round_by_preset_sounded_distances_units(&self, distance_units: f64) -> u32 {
        let distance = distance_units as u32;

        // Round up to the nearest preset
        if let Some(&preset) = self.sounded_distances_units.iter().find(|&&d| d >= distance) {
            return preset;
        }

        match self.sounded_distances_units.last() {
            Some(&largest) => {
                tracing::warn!(
                    distance,
                    largest,
                    "Announcement distance exceeds every sounded preset"
                );
                largest
            }
            None => 0,
        }
    }

    fn length_units(&self) -> LengthUnits {
        self.length_units
    }

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
