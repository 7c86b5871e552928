//! Turn notification validation CLI
//!
//! Replays recorded drive traces through the notification scheduler and
//! validates what gets pronounced:
//! - Realtime mode (1x): Hear-along debugging of notification timing
//! - Accelerated mode: Fast CI validation with checkpoints

mod error;
mod logging;
mod output;
mod replay;
mod trace;
mod verification;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use turnsound_core::{
    LengthUnits, NotificationProgress, RouteFollower, Settings, TurnNotification,
    TurnNotificationScheduler,
};

use crate::output::{CliOutput, OutputLevel};
use crate::replay::VirtualClock;
use crate::trace::DriveTrace;
use crate::verification::{CheckpointVerifier, Expectations, FiredNotification};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ReplayMode {
    /// 1x speed with actual timing delays
    Realtime,
    /// Fast replay with virtual time (default)
    #[default]
    Accelerated,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitsArg {
    Meters,
    Feet,
}

impl From<UnitsArg> for LengthUnits {
    fn from(units: UnitsArg) -> Self {
        match units {
            UnitsArg::Meters => LengthUnits::Meters,
            UnitsArg::Feet => LengthUnits::Feet,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "turnsound-validate")]
#[command(about = "Validate turn notification timing against recorded drives")]
#[command(version)]
struct Args {
    /// Path to drive trace file
    #[arg(short, long)]
    trace: PathBuf,

    /// Path to sound settings TOML (defaults to the unit preset)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Unit preset to use instead of a settings file
    #[arg(short, long, value_enum, conflicts_with = "settings")]
    units: Option<UnitsArg>,

    // ─────────────────────────────────────────────────────────────────────────
    // Replay Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Replay mode
    #[arg(long, value_enum, default_value_t = ReplayMode::Accelerated)]
    mode: ReplayMode,

    /// Custom speed multiplier (overrides --mode)
    #[arg(long)]
    speed: Option<f32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Output Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiet mode: summary only
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode: show every fix and progress change
    #[arg(short, long)]
    verbose: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────
    /// Path to expectations TOML file for checkpoint verification
    #[arg(long)]
    expect: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Debug
    // ─────────────────────────────────────────────────────────────────────────
    /// Start at specific drive time (MM:SS or seconds)
    #[arg(long)]
    start_at: Option<String>,

    /// Stop at specific drive time (MM:SS or seconds)
    #[arg(long)]
    stop_at: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init();

    let output_level = if args.quiet {
        OutputLevel::Quiet
    } else if args.verbose {
        OutputLevel::Verbose
    } else {
        OutputLevel::Normal
    };
    let mut cli = CliOutput::new(output_level);

    let speed = args.speed.unwrap_or(match args.mode {
        ReplayMode::Realtime => 1.0,
        ReplayMode::Accelerated => 0.0, // Instant
    });

    let bounds = TimeBounds {
        start_at_secs: args.start_at.as_deref().map(parse_time_arg).transpose()?,
        stop_at_secs: args.stop_at.as_deref().map(parse_time_arg).transpose()?,
    };

    let trace = DriveTrace::load(&args.trace)?;

    let settings = match (&args.settings, args.units) {
        (Some(path), _) => Settings::load(path)?,
        (None, Some(units)) => Settings::for_units(units.into()),
        (None, None) => Settings::for_units(trace.meta.units.unwrap_or_default()),
    };

    eprintln!("Validating: {} ({} fixes)", trace.meta.name, trace.fixes.len());
    if let Some(description) = &trace.meta.description {
        eprintln!("  {}", description);
    }
    eprintln!(
        "Settings: {} ahead {}s, {}-{} {}",
        settings.length_units,
        settings.time_seconds,
        settings.min_distance_units,
        settings.max_distance_units,
        settings.length_units.abbreviation()
    );
    eprintln!(
        "Mode: {} (speed: {}x)",
        if speed == 0.0 { "accelerated" } else { "realtime" },
        if speed == 0.0 {
            "instant".to_string()
        } else {
            format!("{:.1}", speed)
        }
    );

    let mut verifier = match &args.expect {
        Some(expect_path) => {
            let expectations = Expectations::load(expect_path)?;
            if expectations.meta.trace != trace.meta.name {
                eprintln!(
                    "Warning: expectations file is for '{}' but replaying '{}'",
                    expectations.meta.trace, trace.meta.name
                );
            }
            if let Some(description) = &expectations.meta.description {
                eprintln!("Expectations: {}", description);
            }
            Some(CheckpointVerifier::new(expectations))
        }
        None => None,
    };

    replay_trace(&trace, settings, speed, bounds, &mut cli, verifier.as_mut());

    let verification = verifier.map(|v| {
        if !v.is_complete() {
            eprintln!("Warning: drive ended before every checkpoint was reached");
        }
        v.finalize()
    });

    cli.print_summary(
        trace.maneuver_count(),
        verification
            .as_ref()
            .map(|r| (r.checkpoints_passed, r.checkpoints_total)),
    );
    cli.flush();

    if verification.is_some_and(|r| !r.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Replay
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
struct TimeBounds {
    start_at_secs: Option<f32>,
    stop_at_secs: Option<f32>,
}

/// Feed every fix of `trace` through a fresh, enabled scheduler.
fn replay_trace(
    trace: &DriveTrace,
    settings: Settings,
    speed: f32,
    bounds: TimeBounds,
    cli: &mut CliOutput,
    mut verifier: Option<&mut CheckpointVerifier>,
) -> Vec<FiredNotification> {
    let mut follower = RouteFollower::new(TurnNotificationScheduler::new(settings));
    follower.scheduler_mut().enable(true);

    let drive_start = trace.fixes.first().map(|f| f.at_secs).unwrap_or(0.0);
    let mut clock = VirtualClock::new(drive_start, speed);
    let mut fired = Vec::new();
    let mut heard: Vec<TurnNotification> = Vec::new();

    for fix in &trace.fixes {
        if bounds.start_at_secs.is_some_and(|start| fix.at_secs - drive_start < start) {
            continue;
        }
        if bounds.stop_at_secs.is_some_and(|stop| fix.at_secs - drive_start > stop) {
            break;
        }

        // Sleeps in realtime mode
        clock.advance_to(fix.at_secs);
        let elapsed = clock.elapsed_secs();

        if let Some(enabled) = fix.sound
            && enabled != follower.scheduler().is_enabled()
        {
            follower.scheduler_mut().enable(enabled);
            cli.sound_toggled(elapsed, enabled);
        }

        let location = fix.to_location_fix();
        let scheduler = follower.scheduler();
        let before = if scheduler.next_turn_index() == location.turn.index {
            scheduler.progress()
        } else {
            NotificationProgress::Nothing
        };

        heard.clear();
        let sent = follower.on_location_fix(&location, &mut heard);
        let after = follower.scheduler().progress();

        cli.fix(elapsed, &location, after);

        if follower.scheduler().is_enabled() && before != after {
            cli.progress_change(elapsed, location.turn.index, before, after);
            if sent == 0 && after == NotificationProgress::First {
                cli.silent_first(elapsed, location.turn.index, location.distance_to_turn_meters);
            }
        }

        for notification in &heard {
            cli.notification(elapsed, location.turn.index, after, notification);

            let record = FiredNotification {
                turn_index: location.turn.index,
                stage: after,
                distance_units: notification.distance_units,
                at_secs: elapsed,
            };
            if let Some(v) = verifier.as_deref_mut() {
                v.record_notification(record.clone());
            }
            fired.push(record);
        }

        if let Some(v) = verifier.as_deref_mut() {
            while let Some(result) = v.check_time(elapsed, after) {
                cli.checkpoint(&result);
            }
        }
    }

    tracing::debug!(
        fixes = trace.fixes.len(),
        notifications = fired.len(),
        "Replay finished"
    );
    fired
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_time_arg(s: &str) -> Result<f32, Box<dyn std::error::Error>> {
    if s.contains(':') {
        // Parse MM:SS format
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(format!("Invalid time format '{}', expected MM:SS or seconds", s).into());
        }
        let mins: f32 = parts[0].parse()?;
        let secs: f32 = parts[1].parse()?;
        Ok(mins * 60.0 + secs)
    } else {
        // Parse as seconds
        Ok(s.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// Two turns: a long approach at 20 m/s, then a turn 70 m after the first.
    const DRIVE: &str = r#"
        [meta]
        name = "two_turns"

        [[fix]]
        at_secs = 0.0
        turn_index = 1
        turn = "turn_right"
        distance_meters = 700.0
        speed_mps = 20.0

        [[fix]]
        at_secs = 10.0
        turn_index = 1
        turn = "turn_right"
        distance_meters = 490.0
        speed_mps = 20.0

        [[fix]]
        at_secs = 20.0
        turn_index = 1
        turn = "turn_right"
        distance_meters = 290.0
        speed_mps = 20.0

        [[fix]]
        at_secs = 30.0
        turn_index = 1
        turn = "turn_right"
        distance_meters = 90.0
        speed_mps = 20.0

        [[fix]]
        at_secs = 35.0
        turn_index = 2
        turn = "enter_round_about"
        exit_num = 2
        distance_meters = 70.0
        speed_mps = 10.0

        [[fix]]
        at_secs = 37.0
        turn_index = 2
        turn = "enter_round_about"
        exit_num = 2
        distance_meters = 45.0
        speed_mps = 10.0
    "#;

    fn trace() -> DriveTrace {
        DriveTrace::parse(DRIVE, Path::new("drive.toml")).unwrap()
    }

    fn quiet() -> CliOutput {
        CliOutput::new(OutputLevel::Quiet)
    }

    #[test]
    fn test_parse_time_arg() {
        assert_eq!(parse_time_arg("90").unwrap(), 90.0);
        assert_eq!(parse_time_arg("01:30").unwrap(), 90.0);
        assert!(parse_time_arg("1:2:3").is_err());
        assert!(parse_time_arg("soon").is_err());
    }

    #[test]
    fn test_replay_fires_expected_notifications() {
        let fired = replay_trace(
            &trace(),
            Settings::metric(),
            0.0,
            TimeBounds::default(),
            &mut quiet(),
            None,
        );

        let summary: Vec<(u32, NotificationProgress, u32)> = fired
            .iter()
            .map(|f| (f.turn_index, f.stage, f.distance_units))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, NotificationProgress::First, 400),
                (1, NotificationProgress::Second, 0),
                (2, NotificationProgress::Second, 0),
            ]
        );
        assert_eq!(fired[0].at_secs, 10.0);
    }

    #[test]
    fn test_replay_in_feet() {
        let fired = replay_trace(
            &trace(),
            Settings::imperial(),
            0.0,
            TimeBounds::default(),
            &mut quiet(),
            None,
        );
        assert_eq!(fired[0].distance_units, 1500);
    }

    #[test]
    fn test_replay_stop_at() {
        let bounds = TimeBounds {
            start_at_secs: None,
            stop_at_secs: Some(25.0),
        };
        let fired = replay_trace(&trace(), Settings::metric(), 0.0, bounds, &mut quiet(), None);
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn test_replay_sound_off_suppresses() {
        let content = DRIVE.replacen(
            "distance_meters = 490.0\n        speed_mps = 20.0",
            "distance_meters = 490.0\n        speed_mps = 20.0\n        sound = false",
            1,
        );
        let trace = DriveTrace::parse(&content, Path::new("drive.toml")).unwrap();

        let fired = replay_trace(
            &trace,
            Settings::metric(),
            0.0,
            TimeBounds::default(),
            &mut quiet(),
            None,
        );
        assert!(fired.is_empty());
    }

    #[test]
    fn test_replay_with_verifier() {
        let expectations: Expectations = toml::from_str(
            r#"
            [meta]
            trace = "two_turns"

            [[checkpoint]]
            at_secs = 10.0
            progress = "first"
            notifications = [{ turn_index = 1, stage = "first", distance_units = 400 }]

            [[checkpoint]]
            at_secs = 37.0
            progress = "second"
            notifications = [{ turn_index = 2, stage = "second" }]
            "#,
        )
        .unwrap();
        let mut verifier = CheckpointVerifier::new(expectations);

        replay_trace(
            &trace(),
            Settings::metric(),
            0.0,
            TimeBounds::default(),
            &mut quiet(),
            Some(&mut verifier),
        );

        let result = verifier.finalize();
        assert!(result.passed(), "{:?}", result);
        assert_eq!(result.checkpoints_total, 2);
    }
}
