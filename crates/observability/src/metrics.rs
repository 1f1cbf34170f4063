//! Motion tracker metrics
//!
//! Thin helpers over the `metrics` facade plus an in-memory aggregator for
//! run summaries. Without an installed recorder every helper is a no-op.

use std::collections::HashMap;

use contracts::Movement;
use metrics::{counter, gauge, histogram};

/// Record one sample accepted from a sensor
pub fn record_sample_received(sensor_id: &str) {
    counter!(
        "tilt_coach_samples_received_total",
        "sensor_id" => sensor_id.to_string()
    )
    .increment(1);
}

/// Record one sample rejected as invalid
pub fn record_sample_rejected(sensor_id: &str, field: &'static str) {
    counter!(
        "tilt_coach_samples_rejected_total",
        "sensor_id" => sensor_id.to_string(),
        "field" => field
    )
    .increment(1);
}

/// Record a completed calibration
pub fn record_calibration_completed(baseline: f64) {
    counter!("tilt_coach_calibrations_total").increment(1);
    gauge!("tilt_coach_baseline_x").set(baseline);
}

/// Record one emitted classification
pub fn record_classification(movement: Movement, smoothed: f64) {
    counter!(
        "tilt_coach_classifications_total",
        "movement" => movement.as_str()
    )
    .increment(1);
    gauge!("tilt_coach_smoothed_x").set(smoothed);
    histogram!("tilt_coach_smoothed_x_abs").record(smoothed.abs());
}

/// Record a failed sensor subscription
pub fn record_subscription_failure(sensor_id: &str) {
    counter!(
        "tilt_coach_subscription_failures_total",
        "sensor_id" => sensor_id.to_string()
    )
    .increment(1);
}

/// Record a tracking session start
pub fn record_session_started() {
    counter!("tilt_coach_sessions_started_total").increment(1);
    gauge!("tilt_coach_session_active").set(1.0);
}

/// Record a tracking session end
pub fn record_session_ended(duration_ms: u64) {
    counter!("tilt_coach_sessions_ended_total").increment(1);
    gauge!("tilt_coach_session_active").set(0.0);
    histogram!("tilt_coach_session_duration_ms").record(duration_ms as f64);
}

/// Classification aggregator
///
/// Keeps counts and smoothed-mean statistics in memory.
#[derive(Debug, Clone, Default)]
pub struct ClassificationAggregator {
    /// Samples accepted (all phases)
    pub samples: u64,

    /// Samples rejected as invalid
    pub rejected: u64,

    /// Emitted classifications per movement
    pub movements: HashMap<Movement, u64>,

    /// Number of classification changes
    pub transitions: u64,

    /// Smoothed mean statistics
    pub smoothed_stats: RunningStats,

    last: Option<Movement>,
}

impl ClassificationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sample(&mut self) {
        self.samples += 1;
    }

    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    /// Update with an emitted classification
    pub fn record_classification(&mut self, movement: Movement, smoothed: f64) {
        *self.movements.entry(movement).or_insert(0) += 1;
        if self.last.is_some_and(|last| last != movement) {
            self.transitions += 1;
        }
        self.last = Some(movement);
        self.smoothed_stats.push(smoothed);
    }

    /// Generate summary
    pub fn summary(&self) -> ClassificationSummary {
        let count = |m: Movement| self.movements.get(&m).copied().unwrap_or(0);
        ClassificationSummary {
            samples: self.samples,
            rejected: self.rejected,
            stationary: count(Movement::Stationary),
            left: count(Movement::Left),
            right: count(Movement::Right),
            transitions: self.transitions,
            smoothed_x: StatsSummary::from(&self.smoothed_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Classification summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationSummary {
    pub samples: u64,
    pub rejected: u64,
    pub stationary: u64,
    pub left: u64,
    pub right: u64,
    pub transitions: u64,
    pub smoothed_x: StatsSummary,
}

impl ClassificationSummary {
    /// Total emitted classifications
    pub fn classified(&self) -> u64 {
        self.stationary + self.left + self.right
    }
}

impl std::fmt::Display for ClassificationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Motion Summary ===")?;
        writeln!(f, "Samples: {} ({} rejected)", self.samples, self.rejected)?;
        writeln!(f, "Classified: {}", self.classified())?;
        writeln!(f, "  stationary: {}", self.stationary)?;
        writeln!(f, "  left: {}", self.left)?;
        writeln!(f, "  right: {}", self.right)?;
        writeln!(f, "Transitions: {}", self.transitions)?;
        writeln!(f, "Smoothed x: {}", self.smoothed_x)
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
