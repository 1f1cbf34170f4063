//! `run` command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use contracts::{AppConfig, Movement, SensorSource, SourceKind, TargetPolicy};
use motion_classifier::MotionTracker;
use sensor_source::{MockSensor, MockSensorConfig, MotionProfile, ReplayConfig, ReplaySensor};
use session::{
    Cue, Feedback, RecordingSummary, SessionController, SessionEvent, SimulatedCapture,
    StaticPermissions,
};
use tracing::{info, warn};

use super::load_config;
use crate::cli::RunArgs;
use crate::error::CliError;

/// Execute the `run` command
pub async fn run_session(args: &RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config_loader::ConfigLoader::validate(&config).map_err(CliError::Config)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)
            .context("Failed to start metrics endpoint")?;
    }

    let source = build_source(&config, args)?;
    info!(
        sensor_id = %source.sensor_id(),
        source = ?config.sensor.source,
        calibration_count = config.classifier.calibration_count,
        "Sensor ready"
    );

    let tracker = MotionTracker::new(source, config.classifier.clone());
    let mut controller = SessionController::new(
        tracker,
        Arc::new(StaticPermissions::granted()),
        Box::new(SimulatedCapture::default()),
        config.session.clone(),
    );

    let target = controller.begin().map_err(CliError::from)?;
    println!("Target: move {target}");
    println!(
        "Calibrating over {} samples, hold still...",
        config.classifier.calibration_count
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let limit = (args.duration > 0).then(|| Duration::from_secs(args.duration));
    let timeout = async move {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(timeout);

    let mut ticker = tokio::time::interval(Duration::from_millis(args.poll_ms.max(1)));
    let mut last_shown: Option<(Movement, bool)> = None;

    let summary = loop {
        tokio::select! {
            _ = &mut shutdown => {
                warn!("Received shutdown signal, ending session...");
                break controller.end().map_err(CliError::from)?;
            }
            _ = &mut timeout => {
                info!(duration_secs = args.duration, "Requested duration elapsed");
                break controller.end().map_err(CliError::from)?;
            }
            _ = ticker.tick() => {
                match controller.poll().map_err(CliError::from)? {
                    SessionEvent::Feedback(feedback) => {
                        let shown = (feedback.movement, feedback.is_moving_correctly);
                        if last_shown != Some(shown) {
                            print_feedback(&feedback);
                            last_shown = Some(shown);
                        }
                    }
                    SessionEvent::Ended(summary) => break summary,
                    SessionEvent::Idle => return Ok(()),
                }
            }
        }
    };

    print_summary(&summary);
    info!("Tilt Coach finished");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &RunArgs) {
    if let Some(ref path) = args.replay {
        info!(replay = %path.display(), "Overriding sensor source from CLI");
        config.sensor.source = SourceKind::Replay;
        config.sensor.replay_path = Some(path.clone());
    }
    if let Some(target) = args.target {
        config.session.target = TargetPolicy::Fixed(target);
    }
    if let Some(seed) = args.seed {
        config.session.seed = Some(seed);
        config.sensor.mock_seed = seed;
    }
}

fn build_source(config: &AppConfig, args: &RunArgs) -> Result<Arc<dyn SensorSource>, CliError> {
    let sensor = &config.sensor;
    match sensor.source {
        SourceKind::Mock => {
            let profile: MotionProfile = args.profile.parse()?;
            let mock_config = MockSensorConfig {
                profile,
                noise: sensor.mock_noise,
                seed: sensor.mock_seed,
                ..Default::default()
            };
            Ok(Arc::new(MockSensor::new(&sensor.sensor_id, mock_config)))
        }
        SourceKind::Replay => {
            let path = sensor.replay_path.as_deref().ok_or_else(|| {
                CliError::invalid_argument("sensor.replay_path", "required for replay source")
            })?;
            let replay_config = ReplayConfig {
                speed_multiplier: sensor.replay_speed,
                loop_playback: sensor.replay_loop,
            };
            Ok(Arc::new(ReplaySensor::load(
                path,
                &sensor.sensor_id,
                replay_config,
            )?))
        }
    }
}

fn print_feedback(feedback: &Feedback) {
    let mark = if feedback.is_moving_correctly { "✓" } else { "·" };
    println!("{mark} {:<22} (target: {})", feedback.label(), feedback.target);
    if feedback.cue == Cue::Haptic {
        println!("  ~ haptic ~");
    }
}

fn print_summary(summary: &RecordingSummary) {
    println!("\n=== Recording Summary ===\n");
    println!("Target: {}", summary.target);
    println!("Duration: {:.1}s", summary.duration_ms as f64 / 1000.0);
    println!("Media: {}", summary.media.uri);
    println!();
    print!("{}", summary.motion);
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use contracts::{Direction, Sample};

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["tilt-coach", "run"];
        argv.extend_from_slice(extra);
        match crate::cli::Cli::parse_from(argv).command {
            crate::cli::Commands::Run(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = AppConfig::default();
        let args = run_args(&["--target", "right", "--seed", "3"]);
        apply_overrides(&mut config, &args);

        assert_eq!(config.session.target, TargetPolicy::Fixed(Direction::Right));
        assert_eq!(config.session.seed, Some(3));
        assert_eq!(config.sensor.mock_seed, 3);
        assert_eq!(config.sensor.source, SourceKind::Mock);
    }

    #[test]
    fn test_build_mock_source() {
        let config = AppConfig::default();
        let args = run_args(&["--profile", "still:5,left:5"]);
        let source = build_source(&config, &args).unwrap();
        assert_eq!(source.sensor_id(), "accelerometer");
    }

    #[test]
    fn test_bad_profile_rejected() {
        let config = AppConfig::default();
        let args = run_args(&["--profile", "wobble:3"]);
        assert!(matches!(
            build_source(&config, &args),
            Err(CliError::Sensor(_))
        ));
    }

    #[test]
    fn test_build_replay_source() {
        let file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        sensor_source::write_recording(file.path(), &[Sample::lateral(0.1, 0)]).unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = run_args(&["--replay", &path]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &args);

        let source = build_source(&config, &args).unwrap();
        assert!(!source.is_listening());
    }
}
