//! Error types for CLI operations.

use std::path::PathBuf;

use contracts::ContractError;
use sensor_source::SensorSourceError;
use session::SessionError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration could not be loaded or failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[source] ContractError),

    /// Sensor source could not be built
    #[error("Sensor setup failed: {0}")]
    Sensor(#[from] SensorSourceError),

    /// Recording session failed
    #[error("Session failed: {0}")]
    Session(#[from] SessionError),

    /// Command-line value could not be used
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
