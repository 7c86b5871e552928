//! Logging configuration for the validator.
//!
//! Logs go to stderr so they never interleave with the report on stdout.
//! Set `DEBUG_LOGGING=1` to enable debug output for turnsound crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize stderr logging. Call once, before any replay work.
pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging {
        // DEBUG_LOGGING=1: debug for turnsound crates, warn for dependencies
        "warn,turnsound_core=debug,turnsound_validate=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive))
        .init();

    tracing::debug!(debug_logging, "turnsound-validate logging initialized");
}
