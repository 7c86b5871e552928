//! Error types for trace and expectation files

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a drive trace or an expectations file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn invalid(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
