//! Layered error definitions
//!
//! Categorized by source: sample / subscription / config

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Sample Errors =====
    /// Sample carried non-finite axis data
    #[error("invalid sample: axis '{field}' is not finite ({value})")]
    InvalidSample { field: &'static str, value: f64 },

    // ===== Sensor Errors =====
    /// Sensor source could not be acquired
    #[error("subscription to sensor '{sensor_id}' failed: {message}")]
    SubscriptionFailure { sensor_id: String, message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create invalid sample error
    pub fn invalid_sample(field: &'static str, value: f64) -> Self {
        Self::InvalidSample { field, value }
    }

    /// Create subscription failure
    pub fn subscription_failure(sensor_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SubscriptionFailure {
            sensor_id: sensor_id.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors that only discard the offending sample
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidSample { .. })
    }
}
