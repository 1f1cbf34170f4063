//! Sensor source error types

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

/// Sensor source specific error
#[derive(Debug, Error)]
pub enum SensorSourceError {
    /// Recording could not be read or written
    #[error("recording io error at '{path}': {source}")]
    RecordingIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recording line is not a valid sample
    #[error("recording '{path}' line {line}: {message}")]
    RecordingParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Motion profile text could not be parsed
    #[error("invalid motion profile '{spec}': {message}")]
    InvalidProfile { spec: String, message: String },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SensorSourceError {
    /// Create recording io error
    pub fn recording_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RecordingIo {
            path: path.into(),
            source,
        }
    }

    /// Create profile parse error
    pub fn invalid_profile(spec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProfile {
            spec: spec.into(),
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SensorSourceError>;
