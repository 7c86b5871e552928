//! Colored CLI output for notification events
//!
//! Formats pronounced notifications, progress changes and checkpoint results
//! with colored output for easy visual parsing.

use std::io::{self, Write};

use turnsound_core::{LocationFix, NotificationProgress, TurnNotification};

use crate::replay::clock::format_secs;
use crate::verification::CheckpointResult;

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OutputLevel {
    /// Only show summary at end
    Quiet,
    /// Show notifications and checkpoints (default)
    #[default]
    Normal,
    /// Also show every fix and progress transition
    Verbose,
}

/// CLI output formatter with color support
#[derive(Debug)]
pub struct CliOutput {
    level: OutputLevel,
    use_colors: bool,
    fixes_processed: u32,
    first_notifications: u32,
    second_notifications: u32,
    silent_first_stages: u32,
    sound_toggles: u32,
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new(OutputLevel::Normal)
    }
}

/// Short text of what the speech layer would say
pub fn phrase(notification: &TurnNotification) -> String {
    let mut text = notification.turn_dir.to_string();
    if notification.exit_num > 0 {
        text.push_str(&format!(" (exit {})", notification.exit_num));
    }
    if notification.is_immediate() {
        text.push_str(" now");
    } else {
        text.push_str(&format!(
            " in {} {}",
            notification.distance_units,
            notification.length_units.abbreviation()
        ));
    }
    text
}

impl CliOutput {
    pub fn new(level: OutputLevel) -> Self {
        Self {
            level,
            use_colors: atty::is(atty::Stream::Stdout),
            fixes_processed: 0,
            first_notifications: 0,
            second_notifications: 0,
            silent_first_stages: 0,
            sound_toggles: 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANSI Color Codes
    // ═══════════════════════════════════════════════════════════════════════════

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint("36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Output
    // ═══════════════════════════════════════════════════════════════════════════

    /// Log a processed fix
    pub fn fix(&mut self, elapsed_secs: f32, fix: &LocationFix, progress: NotificationProgress) {
        self.fixes_processed += 1;
        if self.level < OutputLevel::Verbose {
            return;
        }

        let label = self.dim("FIX:");
        println!(
            "[{}] {} turn #{} {} at {:.1} m, {:.1} m/s [{}]",
            format_secs(elapsed_secs),
            label,
            fix.turn.index,
            fix.turn.turn,
            fix.distance_to_turn_meters,
            fix.speed_meters_per_second,
            progress
        );
    }

    /// Log a pronounced notification
    pub fn notification(
        &mut self,
        elapsed_secs: f32,
        turn_index: u32,
        stage: NotificationProgress,
        notification: &TurnNotification,
    ) {
        let (arrow, label) = match stage {
            NotificationProgress::Second => {
                self.second_notifications += 1;
                (self.yellow("-->"), self.yellow("SECOND:"))
            }
            NotificationProgress::First | NotificationProgress::Nothing => {
                self.first_notifications += 1;
                (self.green("-->"), self.green("FIRST:"))
            }
        };
        if self.level < OutputLevel::Normal {
            return;
        }

        let id = self.dim(&format!("(turn #{})", turn_index));
        println!(
            "[{}] {} {} {} {}",
            format_secs(elapsed_secs),
            arrow,
            label,
            phrase(notification),
            id
        );
    }

    /// Log a first stage skipped because the maneuver was already too close
    pub fn silent_first(&mut self, elapsed_secs: f32, turn_index: u32, distance_meters: f64) {
        self.silent_first_stages += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let marker = self.dim("x--");
        let label = self.dim("FIRST SKIPPED:");
        println!(
            "[{}] {} {} turn #{} already {:.1} m away",
            format_secs(elapsed_secs),
            marker,
            label,
            turn_index,
            distance_meters
        );
    }

    /// Log a progress transition
    pub fn progress_change(
        &self,
        elapsed_secs: f32,
        turn_index: u32,
        old: NotificationProgress,
        new: NotificationProgress,
    ) {
        if self.level < OutputLevel::Verbose {
            return;
        }

        let marker = self.cyan("~~~");
        let label = self.cyan("PROGRESS:");
        println!(
            "[{}] {} {} turn #{} {} → {}",
            format_secs(elapsed_secs),
            marker,
            label,
            turn_index,
            old,
            self.bold(new.as_str())
        );
    }

    /// Log voice guidance being switched on or off
    pub fn sound_toggled(&mut self, elapsed_secs: f32, enabled: bool) {
        self.sound_toggles += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let label = if enabled {
            self.bold(&self.green("═══ SOUND ON ═══"))
        } else {
            self.bold(&self.yellow("═══ SOUND OFF ═══"))
        };
        println!("[{}] {}", format_secs(elapsed_secs), label);
    }

    /// Log a checkpoint verification result
    pub fn checkpoint(&self, result: &CheckpointResult) {
        let description = result
            .description
            .as_deref()
            .map(|d| self.dim(&format!(" ({})", d)))
            .unwrap_or_default();

        if result.passed {
            println!(
                "  {} Checkpoint #{} at {:.1}s{}",
                self.green("[PASS]"),
                result.checkpoint_idx + 1,
                result.at_secs,
                description
            );
        } else {
            println!(
                "  {} Checkpoint #{} at {:.1}s{}:",
                self.red("[FAIL]"),
                result.checkpoint_idx + 1,
                result.at_secs,
                description
            );
            for failure in &result.failures {
                println!("         - {}", failure);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Summary Report
    // ═══════════════════════════════════════════════════════════════════════════

    /// Print final summary
    pub fn print_summary(&self, maneuvers: usize, checkpoints_passed: Option<(u32, u32)>) {
        let line = "═".repeat(51);
        println!();
        println!("{}", line);
        println!("  TURN NOTIFICATION SUMMARY");
        println!("{}", line);
        println!("Fixes Processed:      {}", self.fixes_processed);
        println!("Maneuvers:            {}", maneuvers);
        println!("First Notifications:  {}", self.first_notifications);
        println!("Second Notifications: {}", self.second_notifications);
        println!(
            "Skipped First Stages: {}",
            if self.silent_first_stages > 0 {
                self.cyan(&self.silent_first_stages.to_string())
            } else {
                "0".to_string()
            }
        );
        if self.sound_toggles > 0 {
            println!("Sound Toggles:        {}", self.sound_toggles);
        }

        if let Some((passed, total)) = checkpoints_passed {
            let status = if passed == total {
                self.green(&format!("PASSED ({}/{})", passed, total))
            } else {
                self.red(&format!("FAILED ({}/{})", passed, total))
            };
            println!("Verification:         {}", status);
        }
        println!("{}", line);
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}
