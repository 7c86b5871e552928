//! Error types for sound settings

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading, saving or validating sound settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML in {origin}")]
    ParseToml {
        /// File path, or `<inline>` for settings parsed from a string
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid sound settings: {reason}")]
    Invalid { reason: String },
}
