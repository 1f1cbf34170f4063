//! # Observability
//!
//! Logging and metrics for motion tracking sessions.
//!
//! Every sensor sample, calibration and classification made by a
//! `MotionTracker` is reported through the [`metrics`] facade under the
//! `tilt_coach_` prefix:
//!
//! | metric | kind | labels |
//! |---|---|---|
//! | `tilt_coach_samples_received_total` | counter | `sensor_id` |
//! | `tilt_coach_samples_rejected_total` | counter | `sensor_id`, `field` |
//! | `tilt_coach_calibrations_total` / `tilt_coach_baseline_x` | counter / gauge | |
//! | `tilt_coach_classifications_total` | counter | `movement` |
//! | `tilt_coach_smoothed_x` / `tilt_coach_smoothed_x_abs` | gauge / histogram | |
//! | `tilt_coach_subscription_failures_total` | counter | `sensor_id` |
//! | `tilt_coach_sessions_{started,ended}_total`, `tilt_coach_session_duration_ms` | counter / histogram | |
//!
//! Nothing is exported until a Prometheus recorder is installed; without one
//! the calls are no-ops. [`ClassificationAggregator`] keeps the same counts
//! in memory for end-of-session summaries.
//!
//! ```ignore
//! observability::init_with_config(ObservabilityConfig {
//!     log_format: LogFormat::Pretty,
//!     metrics_port: Some(9100),
//!     ..Default::default()
//! })?;
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub use crate::metrics::{
    record_calibration_completed, record_classification, record_sample_received,
    record_sample_rejected, record_session_ended, record_session_started,
    record_subscription_failure, ClassificationAggregator, ClassificationSummary, RunningStats,
    StatsSummary,
};

/// JSON logs at `info`, no metrics endpoint
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Prometheus scrape port; `None` keeps metrics in-process only
    pub metrics_port: Option<u16>,
    /// Filter used when `RUST_LOG` is unset
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: None,
            default_log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        // Sensor threads are named after their source, so keep thread names.
        LogFormat::Json => fmt::layer()
            .json()
            .with_thread_names(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().with_thread_names(true).boxed(),
    }
}

/// Install the tracing subscriber and, if configured, the Prometheus exporter
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    tracing_subscriber::registry()
        .with(fmt_layer(config.log_format))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );
    Ok(())
}

/// Serve `tilt_coach_*` metrics on `0.0.0.0:port`
///
/// For callers that set up tracing themselves (the CLI does).
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .with_context(|| format!("Failed to serve metrics on port {port}"))?;

    tracing::info!(port, "Prometheus metrics endpoint listening");
    Ok(())
}
