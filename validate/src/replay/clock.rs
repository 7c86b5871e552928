//! Virtual clock for replay timing simulation
//!
//! Supports multiple replay modes:
//! - Realtime (1x speed): Sleep between fixes for accurate timing
//! - Accelerated: Fast replay with virtual time tracking
//! - Custom speed: Any multiplier (0.5x slow-mo, 10x fast-forward, etc.)

use std::time::Duration;

/// Virtual clock that maps trace time to wall-clock time
#[derive(Debug)]
pub struct VirtualClock {
    /// Trace time of the first replayed fix
    drive_start_secs: f32,

    /// Current simulated trace time
    current_secs: f32,

    /// Speed multiplier (1.0 = realtime, 0.0 = instant, 10.0 = 10x speed)
    speed_multiplier: f32,
}

impl VirtualClock {
    /// Create a new virtual clock starting at the given trace time
    pub fn new(drive_start_secs: f32, speed_multiplier: f32) -> Self {
        Self {
            drive_start_secs,
            current_secs: drive_start_secs,
            speed_multiplier,
        }
    }

    /// Advance the clock to a trace time, sleeping unless in instant mode
    pub fn advance_to(&mut self, at_secs: f32) {
        if self.speed_multiplier > 0.0 && at_secs > self.current_secs {
            let sleep_secs = (at_secs - self.current_secs) / self.speed_multiplier;
            match Duration::try_from_secs_f32(sleep_secs) {
                Ok(delay) => std::thread::sleep(delay),
                Err(err) => tracing::warn!(
                    sleep_secs,
                    error = %err,
                    "Replay delay out of range, not sleeping"
                ),
            }
        }

        self.current_secs = at_secs;
    }

    /// Seconds elapsed since the first replayed fix
    pub fn elapsed_secs(&self) -> f32 {
        self.current_secs - self.drive_start_secs
    }
}

/// Format seconds as MM:SS.ss
pub fn format_secs(secs: f32) -> String {
    let secs = secs.max(0.0);
    let mins = (secs / 60.0).floor() as u32;
    let secs_remainder = secs % 60.0;
    format!("{:02}:{:05.2}", mins, secs_remainder)
}
