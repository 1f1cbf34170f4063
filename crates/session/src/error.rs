//! Session error types

use contracts::ContractError;
use thiserror::Error;

/// Recording session error
#[derive(Debug, Error)]
pub enum SessionError {
    /// `begin` called while a recording is in progress
    #[error("a recording session is already in progress")]
    AlreadyRecording,

    /// `end` called with no recording in progress
    #[error("no recording session is in progress")]
    NotRecording,

    /// Camera or microphone access missing
    #[error("permissions required (camera: {camera}, microphone: {microphone})")]
    PermissionDenied { camera: bool, microphone: bool },

    /// Permission provider failed
    #[error("permission check failed: {message}")]
    Permission { message: String },

    /// Capture service failed to start or stop
    #[error("capture failed: {message}")]
    Capture { message: String },

    /// Wrapped ContractError (sensor subscription)
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SessionError {
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture {
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SessionError>;
