//! Recorded drive traces
//!
//! A trace is a TOML file of location fixes in time order:
//!
//! ```toml
//! [meta]
//! name = "downtown_loop"
//! units = "meters"
//!
//! [[fix]]
//! at_secs = 0.0
//! turn_index = 1
//! turn = "turn_right"
//! distance_meters = 900.0
//! speed_mps = 20.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use turnsound_core::{LengthUnits, LocationFix, TurnDirection, TurnItem};

use crate::error::LoadError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceMeta {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Preset to use when no settings file is given
    #[serde(default)]
    pub units: Option<LengthUnits>,
}

/// One recorded location fix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFix {
    /// Seconds since the start of the drive
    pub at_secs: f32,

    pub turn_index: u32,
    pub turn: TurnDirection,
    #[serde(default)]
    pub exit_num: u32,

    pub distance_meters: f64,
    pub speed_mps: f64,

    /// Toggle voice guidance before this fix is processed
    #[serde(default)]
    pub sound: Option<bool>,
}

impl TraceFix {
    pub fn to_location_fix(&self) -> LocationFix {
        LocationFix::new(
            TurnItem::with_exit(self.turn_index, self.exit_num, self.turn),
            self.distance_meters,
            self.speed_mps,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveTrace {
    pub meta: TraceMeta,

    #[serde(rename = "fix")]
    pub fixes: Vec<TraceFix>,
}

impl DriveTrace {
    /// Load and check a trace file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, LoadError> {
        let trace: DriveTrace = toml::from_str(content).map_err(|source| LoadError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        trace.check(path)?;
        Ok(trace)
    }

    /// Fixes must be finite, non-negative in distance, and in time order.
    fn check(&self, path: &Path) -> Result<(), LoadError> {
        if self.fixes.is_empty() {
            return Err(LoadError::invalid(path, "trace has no fixes"));
        }

        let mut prev_at = f32::NEG_INFINITY;
        for (i, fix) in self.fixes.iter().enumerate() {
            if !fix.at_secs.is_finite()
                || !fix.distance_meters.is_finite()
                || !fix.speed_mps.is_finite()
            {
                return Err(LoadError::invalid(
                    path,
                    format!("fix #{i} has a non-finite value"),
                ));
            }
            if fix.distance_meters < 0.0 {
                return Err(LoadError::invalid(
                    path,
                    format!("fix #{i} has negative distance {}", fix.distance_meters),
                ));
            }
            if fix.at_secs < prev_at {
                return Err(LoadError::invalid(
                    path,
                    format!("fix #{i} at {:.2}s is earlier than the previous fix", fix.at_secs),
                ));
            }
            prev_at = fix.at_secs;
        }
        Ok(())
    }

    /// Number of distinct maneuvers in the trace
    pub fn maneuver_count(&self) -> usize {
        let mut count = 0;
        let mut last = None;
        for fix in &self.fixes {
            if last != Some(fix.turn_index) {
                count += 1;
                last = Some(fix.turn_index);
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [meta]
        name = "sample"
        units = "feet"

        [[fix]]
        at_secs = 0.0
        turn_index = 1
        turn = "turn_left"
        distance_meters = 600.0
        speed_mps = 15.0

        [[fix]]
        at_secs = 1.0
        turn_index = 1
        turn = "turn_left"
        distance_meters = 585.0
        speed_mps = -1.0

        [[fix]]
        at_secs = 2.0
        turn_index = 2
        turn = "enter_round_about"
        exit_num = 3
        distance_meters = 300.0
        speed_mps = 15.0
        sound = false
    "#;

    fn parse(content: &str) -> Result<DriveTrace, LoadError> {
        DriveTrace::parse(content, Path::new("test.toml"))
    }

    #[test]
    fn test_parse_sample() {
        let trace = parse(SAMPLE).unwrap();

        assert_eq!(trace.meta.units, Some(LengthUnits::Feet));
        assert_eq!(trace.fixes.len(), 3);
        assert_eq!(trace.maneuver_count(), 2);
        assert_eq!(trace.fixes[2].sound, Some(false));

        let fix = trace.fixes[2].to_location_fix();
        assert_eq!(fix.turn.exit_num, 3);
        assert_eq!(fix.turn.turn, TurnDirection::EnterRoundAbout);
    }

    #[test]
    fn test_out_of_order_fixes_rejected() {
        let content = SAMPLE.replace("at_secs = 2.0", "at_secs = 0.5");
        assert!(matches!(parse(&content), Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let content = SAMPLE.replace("distance_meters = 300.0", "distance_meters = -3.0");
        assert!(matches!(parse(&content), Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn test_empty_trace_rejected() {
        let content = "fix = []\n[meta]\nname = \"empty\"\n";
        assert!(matches!(parse(content), Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn test_unknown_turn_is_parse_error() {
        let content = SAMPLE.replace("turn_left", "turn_backwards");
        assert!(matches!(parse(&content), Err(LoadError::ParseToml { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drive.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        assert_eq!(DriveTrace::load(&path).unwrap().meta.name, "sample");
        assert!(matches!(
            DriveTrace::load(&dir.path().join("missing.toml")),
            Err(LoadError::ReadFile { .. })
        ));
    }
}
