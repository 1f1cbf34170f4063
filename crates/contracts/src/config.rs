//! AppConfig - Config Loader output
//!
//! Every section has defaults, so an empty file is a valid configuration.
//! Range checks use the `validator` derive; cross-field rules live in
//! `config_loader`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

use crate::Direction;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    pub version: ConfigVersion,

    #[validate(nested)]
    pub classifier: ClassifierConfig,

    #[validate(nested)]
    pub sensor: SensorConfig,

    #[validate(nested)]
    pub session: SessionConfig,
}

/// How the sign of relative x maps onto left/right
///
/// `PositiveIsLeft`: phone held upright facing away from the user. Moving to
/// the right tilts the device so it reports a negative relative x, which is
/// classified as moving right; positive relative x is moving left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    #[default]
    PositiveIsLeft,
    PositiveIsRight,
}

/// Motion classifier tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Samples averaged into the session baseline
    #[validate(range(min = 1))]
    pub calibration_count: usize,

    /// |smoothed| above this is movement (strict)
    #[validate(range(min = 0.0))]
    pub movement_threshold: f64,

    /// |smoothed| at or below this is stationary (inclusive)
    #[validate(range(min = 0.0))]
    pub stationary_threshold: f64,

    /// Number of relative-x values averaged
    #[validate(range(min = 1, max = 1024))]
    pub smoothing_window: usize,

    /// Requested sensor update interval (ms)
    #[validate(range(min = 1))]
    pub update_interval_ms: u64,

    pub sign_convention: SignConvention,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            calibration_count: 20,
            movement_threshold: 0.15,
            stationary_threshold: 0.05,
            smoothing_window: 5,
            update_interval_ms: 100,
            sign_convention: SignConvention::PositiveIsLeft,
        }
    }
}

impl ClassifierConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

/// Which sensor source feeds the classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Mock,
    Replay,
}

/// Sensor source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SensorConfig {
    #[validate(length(min = 1))]
    pub sensor_id: String,

    pub source: SourceKind,

    /// Recording to replay (required for `replay`)
    pub replay_path: Option<PathBuf>,

    /// Replay speed multiplier (1.0 = original speed)
    #[validate(range(min = 0.1, max = 100.0))]
    pub replay_speed: f64,

    pub replay_loop: bool,

    /// Standard deviation-ish amplitude of mock noise
    #[validate(range(min = 0.0, max = 1.0))]
    pub mock_noise: f64,

    pub mock_seed: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sensor_id: "accelerometer".to_string(),
            source: SourceKind::Mock,
            replay_path: None,
            replay_speed: 1.0,
            replay_loop: false,
            mock_noise: 0.02,
            mock_seed: 7,
        }
    }
}

/// How a session picks the direction to demonstrate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPolicy {
    #[default]
    Random,
    Fixed(Direction),
}

/// Recording session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SessionConfig {
    /// Recording auto-stops after this long (ms)
    #[validate(range(min = 1))]
    pub max_duration_ms: u64,

    pub target: TargetPolicy,

    /// Ask for missing permissions instead of failing immediately
    pub request_permissions: bool,

    /// Seed for random targets (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: 60_000,
            target: TargetPolicy::Random,
            request_permissions: true,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }
}
