//! Sample - Sensor Source output
//!
//! One accelerometer reading. Units are accelerometer-normalized (not SI).

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Accelerometer sample
///
/// Immutable once produced. Only `x` (lateral tilt) feeds the classifier;
/// `y` and `z` are carried through for display and recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Lateral axis
    pub x: f64,

    /// Vertical axis
    pub y: f64,

    /// Depth axis
    pub z: f64,

    /// Sensor timestamp (ms)
    pub timestamp: u64,
}

impl Sample {
    /// Create a sample from all three axes
    pub fn new(x: f64, y: f64, z: f64, timestamp: u64) -> Self {
        Self { x, y, z, timestamp }
    }

    /// Create a sample that only carries lateral data
    pub fn lateral(x: f64, timestamp: u64) -> Self {
        Self::new(x, 0.0, 0.0, timestamp)
    }

    /// Reject samples with non-finite axis data
    pub fn validate(&self) -> Result<(), ContractError> {
        for (field, value) in [("x", self.x), ("y", self.y), ("z", self.z)] {
            if !value.is_finite() {
                return Err(ContractError::invalid_sample(field, value));
            }
        }
        Ok(())
    }
}
