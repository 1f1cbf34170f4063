//! Mock Session Example
//!
//! Runs one recording session against the threaded mock accelerometer and
//! prints every classification change. No device required.
//!
//! Run with: cargo run -p demos --bin mock_session [config.toml]

use std::sync::Arc;
use std::time::Duration;

use config_loader::ConfigLoader;
use contracts::{Direction, SensorSource, TargetPolicy};
use motion_classifier::MotionTracker;
use observability::{LogFormat, ObservabilityConfig};
use sensor_source::{MockSensor, MockSensorConfig, MotionProfile};
use session::{SessionController, SessionEvent, SimulatedCapture, StaticPermissions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Pretty,
        ..Default::default()
    })?;

    tracing::info!("Starting Mock Session Demo");

    // ==== Stage 1: Use default config or load from file ====
    let path = std::env::args().nth(1);
    let mut config = ConfigLoader::load_or_default(path.as_deref().map(std::path::Path::new))?;
    config.classifier.update_interval_ms = 20;
    config.session.target = TargetPolicy::Fixed(Direction::Right);
    config.session.max_duration_ms = 4_000;

    // ==== Stage 2: Mock accelerometer ====
    let sensor: Arc<dyn SensorSource> = Arc::new(MockSensor::new(
        &config.sensor.sensor_id,
        MockSensorConfig {
            profile: MotionProfile::sweep(),
            noise: config.sensor.mock_noise,
            seed: config.sensor.mock_seed,
            ..Default::default()
        },
    ));

    // ==== Stage 3: Tracker + session ====
    let tracker = MotionTracker::new(sensor, config.classifier.clone());
    let mut controller = SessionController::new(
        tracker,
        Arc::new(StaticPermissions::granted()),
        Box::new(SimulatedCapture::default()),
        config.session.clone(),
    );

    let target = controller.begin()?;
    tracing::info!(target_direction = %target, "Session started");

    // ==== Stage 4: Poll until the session ends itself ====
    let mut last = None;
    let summary = loop {
        tokio::time::sleep(Duration::from_millis(50)).await;
        match controller.poll()? {
            SessionEvent::Feedback(feedback) => {
                if last != Some(feedback.movement) {
                    println!(
                        "{:<22} correct={}",
                        feedback.label(),
                        feedback.is_moving_correctly
                    );
                    last = Some(feedback.movement);
                }
            }
            SessionEvent::Ended(summary) => break summary,
            SessionEvent::Idle => return Ok(()),
        }
    };

    println!("\nRecorded {} ({} ms)", summary.media.uri, summary.duration_ms);
    print!("{}", summary.motion);

    Ok(())
}
