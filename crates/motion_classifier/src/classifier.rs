//! Motion classifier state machine.
//!
//! `Inactive -> Calibrating -> Tracking`, back to `Inactive` on reset.
//! The classifier is synchronous and owns all of its accumulation state;
//! the tracker drives it from sensor callbacks.

use contracts::{ClassifierConfig, ContractError, Movement, MovementState, Sample, SignConvention};
use tracing::{debug, instrument, trace};

use crate::calibration::Calibration;
use crate::window::SmoothingWindow;

/// Externally visible classifier phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inactive,
    Calibrating,
    Tracking,
}

#[derive(Debug)]
enum PhaseState {
    Inactive,
    Calibrating(Calibration),
    Tracking {
        baseline: f64,
        window: SmoothingWindow,
    },
}

/// Result of feeding one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Classifier is inactive; the sample was ignored
    Ignored,
    /// Sample was accumulated into calibration
    Calibrating { progress: f64 },
    /// Sample completed calibration
    Calibrated { baseline: f64 },
    /// A new state was classified and should be published
    Classified { state: MovementState, smoothed: f64 },
}

impl SampleOutcome {
    /// The state to publish, if any
    pub fn emitted(&self) -> Option<MovementState> {
        match self {
            SampleOutcome::Classified { state, .. } => Some(*state),
            _ => None,
        }
    }
}

/// Motion classifier
#[derive(Debug)]
pub struct Classifier {
    config: ClassifierConfig,
    phase: PhaseState,
    state: MovementState,
    smoothed: Option<f64>,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            phase: PhaseState::Inactive,
            state: MovementState::initial(),
            smoothed: None,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        match self.phase {
            PhaseState::Inactive => Phase::Inactive,
            PhaseState::Calibrating(_) => Phase::Calibrating,
            PhaseState::Tracking { .. } => Phase::Tracking,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, PhaseState::Inactive)
    }

    /// Enter calibration with fresh state
    ///
    /// Returns `false` (and changes nothing) if already calibrating or tracking.
    pub fn begin(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.clear();
        self.phase = PhaseState::Calibrating(Calibration::new(self.config.calibration_count));
        debug!(
            calibration_count = self.config.calibration_count,
            "Classifier calibrating"
        );
        true
    }

    /// Return to `Inactive`, discarding baseline and window
    pub fn reset(&mut self) {
        self.clear();
        self.phase = PhaseState::Inactive;
    }

    fn clear(&mut self) {
        self.state = MovementState::initial();
        self.smoothed = None;
    }

    /// Route one sample through calibration or classification
    ///
    /// Invalid samples are rejected in every phase and leave state untouched.
    #[instrument(
        level = "trace",
        name = "classifier_on_sample",
        skip(self, sample),
        fields(x = sample.x, timestamp = sample.timestamp)
    )]
    pub fn on_sample(&mut self, sample: &Sample) -> Result<SampleOutcome, ContractError> {
        sample.validate()?;

        let outcome = match &mut self.phase {
            PhaseState::Inactive => SampleOutcome::Ignored,
            PhaseState::Calibrating(calibration) => match calibration.push(sample.x) {
                Some(baseline) => {
                    debug!(baseline, "Calibration complete");
                    self.phase = PhaseState::Tracking {
                        baseline,
                        window: SmoothingWindow::new(self.config.smoothing_window),
                    };
                    SampleOutcome::Calibrated { baseline }
                }
                None => SampleOutcome::Calibrating {
                    progress: calibration.progress(),
                },
            },
            PhaseState::Tracking { baseline, window } => {
                window.push(sample.x - *baseline);
                let smoothed = window.mean();
                let movement = classify(smoothed, &self.config);
                trace!(smoothed, movement = movement.as_str(), "Classified");

                self.smoothed = Some(smoothed);
                self.state = MovementState::classified(movement, *sample);
                SampleOutcome::Classified {
                    state: self.state,
                    smoothed,
                }
            }
        };

        Ok(outcome)
    }

    /// Current output state
    pub fn state(&self) -> MovementState {
        self.state
    }

    /// Session baseline, once calibrated
    pub fn baseline(&self) -> Option<f64> {
        match &self.phase {
            PhaseState::Tracking { baseline, .. } => Some(*baseline),
            _ => None,
        }
    }

    /// Last smoothed mean, once tracking
    pub fn smoothed_mean(&self) -> Option<f64> {
        self.smoothed
    }

    /// Calibration progress in `[0, 1]`
    pub fn calibration_progress(&self) -> f64 {
        match &self.phase {
            PhaseState::Inactive => 0.0,
            PhaseState::Calibrating(calibration) => calibration.progress(),
            PhaseState::Tracking { .. } => 1.0,
        }
    }

    /// Number of relative-x values currently smoothed
    pub fn window_len(&self) -> usize {
        match &self.phase {
            PhaseState::Tracking { window, .. } => window.len(),
            _ => 0,
        }
    }
}

/// Classify a smoothed relative x
///
/// Movement needs `|smoothed| > movement_threshold` (strict). Anything else,
/// including the band between the two thresholds, is stationary, so
/// `|smoothed| <= stationary_threshold` (inclusive) always reports stationary.
pub fn classify(smoothed: f64, config: &ClassifierConfig) -> Movement {
    let (positive, negative) = match config.sign_convention {
        SignConvention::PositiveIsLeft => (Movement::Left, Movement::Right),
        SignConvention::PositiveIsRight => (Movement::Right, Movement::Left),
    };

    if smoothed > config.movement_threshold {
        positive
    } else if smoothed < -config.movement_threshold {
        negative
    } else {
        Movement::Stationary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ClassifierConfig {
        ClassifierConfig {
            calibration_count: 3,
            movement_threshold: 0.1,
            stationary_threshold: 0.02,
            smoothing_window: 2,
            ..Default::default()
        }
    }

    fn feed(classifier: &mut Classifier, xs: &[f64]) -> Vec<MovementState> {
        xs.iter()
            .enumerate()
            .filter_map(|(i, x)| {
                classifier
                    .on_sample(&Sample::lateral(*x, i as u64 * 100))
                    .unwrap()
                    .emitted()
            })
            .collect()
    }

    fn calibrated(config: ClassifierConfig, baseline_x: f64) -> Classifier {
        let mut classifier = Classifier::new(config);
        classifier.begin();
        let n = classifier.config().calibration_count;
        feed(&mut classifier, &vec![baseline_x; n]);
        assert_eq!(classifier.phase(), Phase::Tracking);
        classifier
    }

    #[test]
    fn test_new_classifier_is_inactive() {
        let classifier = Classifier::new(small_config());
        assert_eq!(classifier.phase(), Phase::Inactive);
        assert_eq!(classifier.state(), MovementState::initial());
        assert_eq!(classifier.baseline(), None);
    }

    #[test]
    fn test_inactive_ignores_samples() {
        let mut classifier = Classifier::new(small_config());
        let outcome = classifier.on_sample(&Sample::lateral(0.5, 0)).unwrap();
        assert_eq!(outcome, SampleOutcome::Ignored);
        assert_eq!(classifier.state(), MovementState::initial());
    }

    #[test]
    fn test_calibration_does_not_emit() {
        let mut classifier = Classifier::new(small_config());
        classifier.begin();

        let emitted = feed(&mut classifier, &[0.9, -0.4, 0.7]);
        assert!(emitted.is_empty());
        assert_eq!(classifier.state(), MovementState::initial());
        assert_eq!(classifier.phase(), Phase::Tracking);
    }

    #[test]
    fn test_baseline_is_mean_of_calibration_samples() {
        let mut classifier = Classifier::new(small_config());
        classifier.begin();

        let outcomes: Vec<_> = [0.1, 0.2, 0.6]
            .iter()
            .map(|x| classifier.on_sample(&Sample::lateral(*x, 0)).unwrap())
            .collect();

        assert!(matches!(outcomes[0], SampleOutcome::Calibrating { .. }));
        assert!(matches!(outcomes[2], SampleOutcome::Calibrated { .. }));
        assert!((classifier.baseline().unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(classifier.window_len(), 0);
    }

    #[test]
    fn test_sustained_positive_is_moving() {
        let mut classifier = calibrated(small_config(), 0.0);

        let emitted = feed(&mut classifier, &[0.2, 0.2]);
        assert_eq!(emitted.len(), 2);

        let last = emitted[1];
        assert!(last.is_moving_left);
        assert!(!last.is_moving_right);
        assert!(!last.is_stationary);
        assert!((classifier.smoothed_mean().unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_noise_is_stationary() {
        let mut classifier = calibrated(small_config(), 0.0);

        let emitted = feed(&mut classifier, &[0.01, -0.01]);
        let last = emitted[1];
        assert!(last.is_stationary);
        assert!(!last.is_moving_left);
        assert!(!last.is_moving_right);
        assert!(classifier.smoothed_mean().unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_baseline_offset_is_subtracted() {
        let mut classifier = calibrated(small_config(), 0.5);

        let emitted = feed(&mut classifier, &[0.5, 0.5]);
        assert!(emitted[1].is_stationary);

        let emitted = feed(&mut classifier, &[0.3, 0.3]);
        assert!(emitted[1].is_moving_right);
    }

    #[test]
    fn test_last_sample_is_carried() {
        let mut classifier = calibrated(small_config(), 0.0);
        let sample = Sample::new(0.05, 0.1, -0.98, 4242);
        let outcome = classifier.on_sample(&sample).unwrap();
        assert_eq!(outcome.emitted().unwrap().last_sample, sample);
    }

    #[test]
    fn test_movement_threshold_is_strict() {
        let config = small_config();
        assert_eq!(classify(0.1, &config), Movement::Stationary);
        assert_eq!(classify(-0.1, &config), Movement::Stationary);
        assert_eq!(classify(0.1000001, &config), Movement::Left);
        assert_eq!(classify(-0.1000001, &config), Movement::Right);
    }

    #[test]
    fn test_stationary_threshold_is_inclusive() {
        let config = small_config();
        assert_eq!(classify(0.02, &config), Movement::Stationary);
        assert_eq!(classify(-0.02, &config), Movement::Stationary);
    }

    #[test]
    fn test_between_thresholds_is_stationary() {
        let config = small_config();
        assert_eq!(classify(0.05, &config), Movement::Stationary);
        assert_eq!(classify(-0.05, &config), Movement::Stationary);
        assert_eq!(classify(0.0999, &config), Movement::Stationary);
    }

    #[test]
    fn test_exact_threshold_after_left_is_not_moving() {
        let mut classifier = calibrated(small_config(), 0.0);

        let emitted = feed(&mut classifier, &[0.2, 0.2, 0.1, 0.1]);
        assert!(emitted[1].is_moving_left);

        assert_eq!(classifier.smoothed_mean(), Some(0.1));
        assert!(emitted[3].is_stationary);
        assert!(!emitted[3].is_moving_left);
    }

    #[test]
    fn test_exact_threshold_after_right_is_not_moving() {
        let mut classifier = calibrated(small_config(), 0.0);

        let emitted = feed(&mut classifier, &[-0.2, -0.2, -0.1, -0.1]);
        assert!(emitted[1].is_moving_right);

        assert_eq!(classifier.smoothed_mean(), Some(-0.1));
        assert!(emitted[3].is_stationary);
        assert!(!emitted[3].is_moving_right);
    }

    #[test]
    fn test_positive_mean_after_right_never_reports_right() {
        let mut classifier = calibrated(small_config(), 0.0);

        let emitted = feed(&mut classifier, &[-0.2, -0.2, 0.05, 0.05]);
        assert!(emitted[1].is_moving_right);

        // window [0.05, 0.05] sits between the thresholds
        assert!((classifier.smoothed_mean().unwrap() - 0.05).abs() < 1e-12);
        assert!(emitted[3].is_stationary);
        assert!(!emitted[3].is_moving_right);
        assert!(!emitted[3].is_moving_left);
    }

    #[test]
    fn test_flags_stay_exclusive() {
        let mut classifier = calibrated(small_config(), 0.0);
        let xs = [0.3, -0.5, 0.04, 0.0, 0.15, -0.08, 0.11, 0.02, -0.3, 0.6];
        for state in feed(&mut classifier, &xs) {
            assert!(!(state.is_moving_left && state.is_moving_right));
            assert_eq!(
                state.is_stationary,
                !state.is_moving_left && !state.is_moving_right
            );
        }
    }

    #[test]
    fn test_positive_is_right_mirrors() {
        let config = ClassifierConfig {
            sign_convention: SignConvention::PositiveIsRight,
            ..small_config()
        };
        let mut classifier = calibrated(config, 0.0);

        let emitted = feed(&mut classifier, &[0.2, 0.2]);
        assert!(emitted[1].is_moving_right);

        let emitted = feed(&mut classifier, &[-0.2, -0.2]);
        assert!(emitted[1].is_moving_left);
    }

    #[test]
    fn test_invalid_sample_rejected_without_state_change() {
        let mut classifier = calibrated(small_config(), 0.0);
        feed(&mut classifier, &[0.2, 0.2]);
        let before = classifier.state();
        let window_before = classifier.window_len();

        for bad in [
            Sample::lateral(f64::NAN, 0),
            Sample::lateral(f64::INFINITY, 0),
            Sample::new(0.0, f64::NEG_INFINITY, 0.0, 0),
        ] {
            let err = classifier.on_sample(&bad).unwrap_err();
            assert!(matches!(err, ContractError::InvalidSample { .. }));
        }

        assert_eq!(classifier.state(), before);
        assert_eq!(classifier.window_len(), window_before);
        assert!(classifier.smoothed_mean().unwrap().is_finite());
    }

    #[test]
    fn test_invalid_sample_not_counted_in_calibration() {
        let mut classifier = Classifier::new(small_config());
        classifier.begin();

        feed(&mut classifier, &[0.3]);
        assert!(classifier.on_sample(&Sample::lateral(f64::NAN, 1)).is_err());
        feed(&mut classifier, &[0.3]);
        assert_eq!(classifier.phase(), Phase::Calibrating);

        feed(&mut classifier, &[0.3]);
        assert!((classifier.baseline().unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_begin_is_idempotent() {
        let mut classifier = Classifier::new(small_config());
        assert!(classifier.begin());
        feed(&mut classifier, &[0.1, 0.1]);

        assert!(!classifier.begin());
        assert!((classifier.calibration_progress() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_discards_session() {
        let mut classifier = calibrated(small_config(), 0.0);
        feed(&mut classifier, &[0.5, 0.5]);
        assert!(classifier.state().is_moving_left);

        classifier.reset();
        classifier.reset();
        assert_eq!(classifier.phase(), Phase::Inactive);
        assert_eq!(classifier.state(), MovementState::initial());
        assert_eq!(classifier.baseline(), None);
        assert_eq!(classifier.smoothed_mean(), None);
    }

    #[test]
    fn test_no_window_leak_across_sessions() {
        let mut classifier = calibrated(small_config(), 0.0);
        feed(&mut classifier, &[0.9, 0.9]);

        classifier.reset();
        classifier.begin();
        feed(&mut classifier, &[1.0, 1.0, 1.0]);
        assert!((classifier.baseline().unwrap() - 1.0).abs() < 1e-12);

        // a leaked 0.9 entry would pull the mean of the first post-reset
        // value away from 0.01
        let emitted = feed(&mut classifier, &[1.01]);
        assert_eq!(classifier.window_len(), 1);
        assert!((classifier.smoothed_mean().unwrap() - 0.01).abs() < 1e-9);
        assert!(emitted[0].is_stationary);
    }

    #[test]
    fn test_deterministic_output() {
        let xs = [0.0, 0.0, 0.0, 0.2, 0.12, -0.05, -0.3, -0.3, 0.01];
        let run = || {
            let mut classifier = Classifier::new(small_config());
            classifier.begin();
            feed(&mut classifier, &xs)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_default_constants_need_twenty_samples() {
        let mut classifier = Classifier::new(ClassifierConfig::default());
        classifier.begin();
        let emitted = feed(&mut classifier, &[0.0; 19]);
        assert!(emitted.is_empty());
        assert_eq!(classifier.phase(), Phase::Calibrating);

        feed(&mut classifier, &[0.0]);
        assert_eq!(classifier.phase(), Phase::Tracking);
    }
}
