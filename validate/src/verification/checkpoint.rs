//! Checkpoint-based notification verification
//!
//! Allows defining expected notifications and scheduler progress at specific
//! drive times and verifying that actual behavior matches expectations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use turnsound_core::NotificationProgress;

use crate::error::LoadError;

/// A notification that should have been pronounced by a checkpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedNotification {
    pub turn_index: u32,

    /// `first` or `second`
    pub stage: NotificationProgress,

    /// Pronounced distance; unchecked when absent
    #[serde(default)]
    pub distance_units: Option<u32>,
}

/// A checkpoint defines expected state at a specific drive time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Drive time in seconds when to check
    pub at_secs: f32,

    /// Notifications that should have fired by this time
    #[serde(default)]
    pub notifications: Vec<ExpectedNotification>,

    /// Scheduler progress expected at this time
    #[serde(default)]
    pub progress: Option<NotificationProgress>,

    /// Optional description for debugging
    #[serde(default)]
    pub description: Option<String>,
}

/// Full expectations file for a drive trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectations {
    pub meta: ExpectationsMeta,

    #[serde(rename = "checkpoint")]
    pub checkpoints: Vec<Checkpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationsMeta {
    /// Trace name this expectation file is for
    pub trace: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Tolerance in seconds for timing comparisons (default 0.5)
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: f32,
}

fn default_tolerance() -> f32 {
    0.5
}

impl Expectations {
    /// Load expectations from a TOML file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let expectations: Expectations =
            toml::from_str(&content).map_err(|source| LoadError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;

        for checkpoint in &expectations.checkpoints {
            if let Some(bad) = checkpoint
                .notifications
                .iter()
                .find(|n| n.stage == NotificationProgress::Nothing)
            {
                return Err(LoadError::invalid(
                    path,
                    format!(
                        "checkpoint at {:.1}s expects a 'nothing' stage for turn #{}",
                        checkpoint.at_secs, bad.turn_index
                    ),
                ));
            }
        }
        Ok(expectations)
    }
}

/// A notification observed during replay
#[derive(Debug, Clone, PartialEq)]
pub struct FiredNotification {
    pub turn_index: u32,
    pub stage: NotificationProgress,
    pub distance_units: u32,
    pub at_secs: f32,
}

/// Result of verifying a single checkpoint
#[derive(Debug, Clone)]
pub struct CheckpointResult {
    pub checkpoint_idx: usize,
    pub at_secs: f32,
    pub description: Option<String>,
    pub passed: bool,
    pub failures: Vec<String>,
}

/// Overall verification result
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub checkpoints_passed: u32,
    pub checkpoints_total: u32,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.checkpoints_passed == self.checkpoints_total
    }
}

/// Verifies notification behavior against expected checkpoints
#[derive(Debug)]
pub struct CheckpointVerifier {
    expectations: Expectations,
    current_checkpoint_idx: usize,
    results: Vec<CheckpointResult>,

    fired: Vec<FiredNotification>,
}

impl CheckpointVerifier {
    pub fn new(expectations: Expectations) -> Self {
        Self {
            expectations,
            current_checkpoint_idx: 0,
            results: Vec::new(),
            fired: Vec::new(),
        }
    }

    /// Record that a notification was pronounced
    pub fn record_notification(&mut self, notification: FiredNotification) {
        self.fired.push(notification);
    }

    /// Verify the next checkpoint if the drive has reached it.
    ///
    /// Call repeatedly until it returns `None`: several checkpoints may fall
    /// between two fixes.
    pub fn check_time(
        &mut self,
        drive_time_secs: f32,
        progress: NotificationProgress,
    ) -> Option<CheckpointResult> {
        let checkpoint = self.expectations.checkpoints.get(self.current_checkpoint_idx)?;
        let tolerance = self.expectations.meta.tolerance_secs;

        if drive_time_secs < checkpoint.at_secs - tolerance {
            return None;
        }

        let mut failures = Vec::new();

        for expected in &checkpoint.notifications {
            let found = self
                .fired
                .iter()
                .find(|f| f.turn_index == expected.turn_index && f.stage == expected.stage);

            match found {
                None => {
                    failures.push(format!(
                        "{} notification for turn #{} should have fired but hasn't",
                        expected.stage, expected.turn_index
                    ));
                }
                Some(fired) => {
                    if let Some(distance) = expected.distance_units
                        && fired.distance_units != distance
                    {
                        failures.push(format!(
                            "{} notification for turn #{} pronounced {} instead of {} (at {:.1}s)",
                            expected.stage,
                            expected.turn_index,
                            fired.distance_units,
                            distance,
                            fired.at_secs
                        ));
                    }
                }
            }
        }

        if let Some(expected) = checkpoint.progress
            && expected != progress
        {
            failures.push(format!("progress is {} but expected {}", progress, expected));
        }

        let result = CheckpointResult {
            checkpoint_idx: self.current_checkpoint_idx,
            at_secs: checkpoint.at_secs,
            description: checkpoint.description.clone(),
            passed: failures.is_empty(),
            failures,
        };

        self.results.push(result.clone());
        self.current_checkpoint_idx += 1;

        Some(result)
    }

    /// Get final verification result. Checkpoints never reached count as failed.
    pub fn finalize(self) -> VerificationResult {
        let passed = self.results.iter().filter(|r| r.passed).count() as u32;
        let total = self.expectations.checkpoints.len() as u32;

        VerificationResult {
            checkpoints_passed: passed,
            checkpoints_total: total,
        }
    }

    /// Check if all checkpoints have been processed
    pub fn is_complete(&self) -> bool {
        self.current_checkpoint_idx >= self.expectations.checkpoints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_expectations() -> Expectations {
        Expectations {
            meta: ExpectationsMeta {
                trace: "test_drive".to_string(),
                description: None,
                tolerance_secs: 0.5,
            },
            checkpoints: vec![
                Checkpoint {
                    at_secs: 15.0,
                    notifications: vec![ExpectedNotification {
                        turn_index: 1,
                        stage: NotificationProgress::First,
                        distance_units: Some(400),
                    }],
                    progress: Some(NotificationProgress::First),
                    description: Some("First announcement".to_string()),
                },
                Checkpoint {
                    at_secs: 30.0,
                    notifications: vec![ExpectedNotification {
                        turn_index: 1,
                        stage: NotificationProgress::Second,
                        distance_units: None,
                    }],
                    progress: None,
                    description: None,
                },
            ],
        }
    }

    fn fired(
        turn_index: u32,
        stage: NotificationProgress,
        distance_units: u32,
    ) -> FiredNotification {
        FiredNotification {
            turn_index,
            stage,
            distance_units,
            at_secs: 0.0,
        }
    }

    #[test]
    fn test_checkpoint_pass() {
        let mut verifier = CheckpointVerifier::new(sample_expectations());
        verifier.record_notification(fired(1, NotificationProgress::First, 400));

        assert!(verifier.check_time(10.0, NotificationProgress::First).is_none());

        let result = verifier
            .check_time(15.0, NotificationProgress::First)
            .unwrap();
        assert!(result.passed, "failures: {:?}", result.failures);
        assert!(!verifier.is_complete());
    }

    #[test]
    fn test_checkpoint_within_tolerance() {
        let mut verifier = CheckpointVerifier::new(sample_expectations());
        verifier.record_notification(fired(1, NotificationProgress::First, 400));

        assert!(verifier.check_time(14.6, NotificationProgress::First).is_some());
    }

    #[test]
    fn test_checkpoint_missing_notification() {
        let mut verifier = CheckpointVerifier::new(sample_expectations());

        let result = verifier
            .check_time(15.0, NotificationProgress::Nothing)
            .unwrap();
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
    }

    #[test]
    fn test_checkpoint_wrong_distance() {
        let mut verifier = CheckpointVerifier::new(sample_expectations());
        verifier.record_notification(fired(1, NotificationProgress::First, 500));

        let result = verifier
            .check_time(15.0, NotificationProgress::First)
            .unwrap();
        assert!(!result.passed);
        assert!(result.failures[0].contains("pronounced 500 instead of 400"));
    }

    #[test]
    fn test_multiple_checkpoints_in_one_step() {
        let mut verifier = CheckpointVerifier::new(sample_expectations());
        verifier.record_notification(fired(1, NotificationProgress::First, 400));
        verifier.record_notification(fired(1, NotificationProgress::Second, 0));

        let mut checked = 0;
        while let Some(result) = verifier.check_time(40.0, NotificationProgress::Second) {
            checked += 1;
            if result.checkpoint_idx == 0 {
                // Progress already moved on past the first checkpoint
                assert!(!result.passed);
            } else {
                assert!(result.passed);
            }
        }

        assert_eq!(checked, 2);
        assert!(verifier.is_complete());
    }

    #[test]
    fn test_unreached_checkpoints_fail() {
        let mut verifier = CheckpointVerifier::new(sample_expectations());
        verifier.record_notification(fired(1, NotificationProgress::First, 400));
        verifier.check_time(15.0, NotificationProgress::First);

        let result = verifier.finalize();
        assert_eq!(result.checkpoints_passed, 1);
        assert_eq!(result.checkpoints_total, 2);
        assert!(!result.passed());
    }

    #[test]
    fn test_load_rejects_nothing_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expect.toml");
        std::fs::write(
            &path,
            r#"
            [meta]
            trace = "t"

            [[checkpoint]]
            at_secs = 1.0
            notifications = [{ turn_index = 1, stage = "nothing" }]
            "#,
        )
        .unwrap();

        assert!(matches!(Expectations::load(&path), Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expect.toml");
        std::fs::write(
            &path,
            r#"
            [meta]
            trace = "t"

            [[checkpoint]]
            at_secs = 12.0
            progress = "second"
            notifications = [{ turn_index = 4, stage = "second", distance_units = 0 }]
            "#,
        )
        .unwrap();

        let expectations = Expectations::load(&path).unwrap();
        assert_eq!(expectations.meta.tolerance_secs, 0.5);
        assert_eq!(expectations.checkpoints[0].progress, Some(NotificationProgress::Second));
        assert_eq!(expectations.checkpoints[0].notifications[0].distance_units, Some(0));
    }
}
