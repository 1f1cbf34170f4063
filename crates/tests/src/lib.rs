//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! - Contract smoke tests
//! - Sensor -> tracker -> session flows with manual, mock and replay sources
//! - Configuration files driving the classifier

#[cfg(test)]
mod contract_tests {
    use contracts::{AppConfig, MovementState};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_default_config_validates() {
        assert!(config_loader::ConfigLoader::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_initial_state_is_stationary() {
        let state = MovementState::default();
        assert!(state.is_stationary && !state.is_moving_left && !state.is_moving_right);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        ClassifierConfig, Direction, ManualClock, Movement, MovementState, Sample, SensorSource,
        SessionConfig, TargetPolicy,
    };
    use motion_classifier::{MotionTracker, Phase};
    use sensor_source::{
        ManualSensor, MockSensor, MockSensorConfig, MotionProfile, ReplayConfig, ReplaySensor,
    };
    use session::{
        Cue, SessionController, SessionError, SessionEvent, SimulatedCapture, StaticPermissions,
    };
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn fast_config() -> ClassifierConfig {
        ClassifierConfig {
            calibration_count: 5,
            smoothing_window: 3,
            update_interval_ms: 2,
            ..Default::default()
        }
    }

    /// End-to-end: ManualSensor -> MotionTracker -> SessionController
    ///
    /// Covers one full recording: calibration, wrong-way movement, correct
    /// movement with a single haptic cue, and the end-of-session reset.
    #[test]
    fn test_e2e_manual_session() {
        let sensor = Arc::new(ManualSensor::new("accel"));
        let clock = Arc::new(ManualClock::new(0));
        let tracker = MotionTracker::new(sensor.clone(), fast_config());
        let mut controller = SessionController::new(
            tracker,
            Arc::new(StaticPermissions::grant_on_request()),
            Box::new(SimulatedCapture::default()),
            SessionConfig {
                target: TargetPolicy::Fixed(Direction::Right),
                ..Default::default()
            },
        )
        .with_clock(clock.clone());

        assert_eq!(controller.begin().unwrap(), Direction::Right);

        // resting tilt of 0.1 becomes the baseline
        sensor.emit_x(&[0.1; 5]);
        assert!((controller.tracker().baseline().unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(controller.movement_state(), MovementState::initial());

        sensor.emit_x(&[0.4, 0.4, 0.4]);
        let SessionEvent::Feedback(feedback) = controller.poll().unwrap() else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.movement, Movement::Left);
        assert!(!feedback.is_moving_correctly);

        let mut cues = Vec::new();
        for _ in 0..4 {
            sensor.emit_x(&[-0.2]);
            clock.advance(100);
            if let SessionEvent::Feedback(feedback) = controller.poll().unwrap() {
                cues.push(feedback.cue);
            }
        }
        assert_eq!(controller.movement_state().movement(), Movement::Right);
        assert_eq!(cues.iter().filter(|c| **c == Cue::Haptic).count(), 1);

        let summary = controller.end().unwrap();
        assert_eq!(summary.duration_ms, 400);
        assert_eq!(summary.target, Direction::Right);
        assert!(summary.motion.right >= 1);
        assert_eq!(controller.movement_state(), MovementState::initial());
        assert!(!sensor.is_listening());
    }

    /// End-to-end: threaded MockSensor reaches tracking and reports movement
    #[tokio::test]
    async fn test_e2e_mock_sensor_left() {
        let profile: MotionProfile = "still:10,left:1000".parse().unwrap();
        let sensor = Arc::new(MockSensor::new(
            "mock",
            MockSensorConfig {
                profile,
                noise: 0.0,
                ..Default::default()
            },
        ));
        let mut tracker = MotionTracker::new(sensor.clone(), fast_config());
        let mut changes = tracker.changes();

        tracker.start().unwrap();

        let state = timeout(WAIT, changes.wait_for(|s| s.is_moving_left))
            .await
            .expect("timed out waiting for left movement")
            .map(|s| *s)
            .unwrap();
        assert!(state.is_moving_left);
        assert_eq!(tracker.phase(), Phase::Tracking);
        assert!((tracker.baseline().unwrap() - 0.03).abs() < 1e-9);

        tracker.stop();
        assert!(!sensor.is_listening());
        assert_eq!(tracker.state(), MovementState::initial());
    }

    /// Stop while a source thread is delivering must not leak late samples
    #[tokio::test]
    async fn test_e2e_stop_discards_in_flight_samples() {
        let sensor = Arc::new(MockSensor::new(
            "mock",
            MockSensorConfig {
                profile: MotionProfile::sweep(),
                noise: 0.05,
                ..Default::default()
            },
        ));
        let mut tracker = MotionTracker::new(sensor, fast_config());
        let mut changes = tracker.changes();

        tracker.start().unwrap();
        timeout(WAIT, changes.wait_for(|s| s.last_sample.timestamp > 0))
            .await
            .expect("timed out waiting for tracking")
            .unwrap();

        tracker.stop();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(tracker.state(), MovementState::initial());
        assert_eq!(tracker.phase(), Phase::Inactive);
    }

    /// End-to-end: recording file -> ReplaySensor -> MotionTracker
    #[tokio::test]
    async fn test_e2e_replay_recording() {
        let mut samples: Vec<Sample> = (0..5).map(|i| Sample::lateral(0.0, i * 10)).collect();
        samples.extend((5..10).map(|i| Sample::lateral(-0.5, i * 10)));
        samples.extend((10..20).map(|i| Sample::lateral(0.01, i * 10)));

        let file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        sensor_source::write_recording(file.path(), &samples).unwrap();

        let sensor = Arc::new(
            ReplaySensor::load(
                file.path(),
                "replay",
                ReplayConfig {
                    speed_multiplier: 10.0,
                    loop_playback: false,
                },
            )
            .unwrap(),
        );
        let mut tracker = MotionTracker::new(sensor, fast_config());
        let mut changes = tracker.changes();
        tracker.start().unwrap();

        timeout(WAIT, changes.wait_for(|s| s.last_sample.timestamp == 190))
            .await
            .expect("timed out waiting for end of recording")
            .unwrap();

        assert!(tracker.state().is_stationary);
        let summary = tracker.summary();
        assert_eq!(summary.samples, 20);
        assert_eq!(summary.classified(), 15);
        // five samples at -0.5, then two mixed windows still below -0.15
        assert_eq!(summary.right, 7);
        assert_eq!(summary.stationary, 8);
        tracker.stop();
    }

    /// Configuration text drives the classifier, including the sign convention
    #[test]
    fn test_e2e_config_file_sign_convention() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[classifier]
calibration_count = 2
smoothing_window = 1
movement_threshold = 0.1
stationary_threshold = 0.02
sign_convention = "positive_is_right"
"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        let sensor = Arc::new(ManualSensor::new("accel"));
        let mut tracker = MotionTracker::new(sensor.clone(), config.classifier);

        tracker.start().unwrap();
        sensor.emit_x(&[0.0, 0.0, 0.3]);
        assert!(tracker.state().is_moving_right);

        sensor.emit_x(&[-0.3]);
        assert!(tracker.state().is_moving_left);
    }

    #[test]
    fn test_e2e_invalid_config_rejected() {
        let err = ConfigLoader::load_from_str(
            "[classifier]\nmovement_threshold = 0.01\nstationary_threshold = 0.5\n",
            ConfigFormat::Toml,
        )
        .unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    /// Repeated sessions on one controller: each recalibrates from scratch
    #[test]
    fn test_e2e_sessions_do_not_share_state() {
        let sensor = Arc::new(ManualSensor::new("accel"));
        let tracker = MotionTracker::new(sensor.clone(), fast_config());
        let mut controller = SessionController::new(
            tracker,
            Arc::new(StaticPermissions::granted()),
            Box::new(SimulatedCapture::default()),
            SessionConfig {
                target: TargetPolicy::Fixed(Direction::Left),
                ..Default::default()
            },
        );

        controller.begin().unwrap();
        sensor.emit_x(&[0.0; 5]);
        sensor.emit_x(&[0.5; 3]);
        assert!(controller.movement_state().is_moving_left);
        let first = controller.end().unwrap();

        controller.begin().unwrap();
        sensor.emit_x(&[0.5; 5]);
        assert_eq!(controller.tracker().baseline(), Some(0.5));
        sensor.emit_x(&[0.5]);
        assert!(controller.movement_state().is_stationary);
        let second = controller.end().unwrap();

        assert_ne!(first.media, second.media);
        assert_eq!(second.motion.left, 0);
        assert!(matches!(controller.end(), Err(SessionError::NotRecording)));
    }

    #[test]
    fn test_e2e_permission_denied_keeps_sensor_idle() {
        let sensor = Arc::new(ManualSensor::new("accel"));
        let tracker = MotionTracker::new(sensor.clone(), fast_config());
        let mut controller = SessionController::new(
            tracker,
            Arc::new(StaticPermissions::denied()),
            Box::new(SimulatedCapture::default()),
            SessionConfig::default(),
        );

        assert!(matches!(
            controller.begin(),
            Err(SessionError::PermissionDenied { .. })
        ));
        assert_eq!(sensor.subscribe_count(), 0);
        assert!(!controller.recording_state().is_recording);
    }
}
