//! Error types for pulse-replay

use std::path::PathBuf;

use pulse_friction::FrictionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Trace line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Trace line {line}: timestamp {at} precedes previous record at {previous}")]
    OutOfOrder { line: usize, at: u64, previous: u64 },

    #[error("Invalid settings file: {0}")]
    SettingsFormat(#[source] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Settings(#[from] FrictionError),
}

impl ReplayError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReplayError::Io { .. } => 2,
            ReplayError::Parse { .. } | ReplayError::OutOfOrder { .. } => 3,
            ReplayError::SettingsFormat(_) | ReplayError::Settings(_) => 4,
        }
    }
}
