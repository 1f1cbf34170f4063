//! Motion tracker
//!
//! Owns the sensor subscription for one classifier. `start` subscribes and
//! enters calibration, `stop` releases the subscription and resets the
//! classifier. States are published through a `watch` channel.
//!
//! Each `start` tags its callback with a session id. Samples from a stale
//! session (delivered by a source thread racing with `stop`) are dropped
//! under the same lock that `stop` takes, so nothing from an old session can
//! reach the new one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{
    Clock, ClassifierConfig, ContractError, MovementState, Sample, SensorSource, Subscription,
    SystemClock,
};
use observability::{metrics, ClassificationAggregator, ClassificationSummary};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::classifier::{Classifier, Phase, SampleOutcome};

const NO_SESSION: u64 = 0;

struct Inner {
    classifier: Classifier,
    session: u64,
    aggregator: ClassificationAggregator,
}

struct Shared {
    sensor_id: String,
    inner: Mutex<Inner>,
    tx: watch::Sender<MovementState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, session: u64, sample: Sample) {
        let mut inner = self.lock();
        if inner.session != session {
            return;
        }

        inner.aggregator.record_sample();
        metrics::record_sample_received(&self.sensor_id);

        match inner.classifier.on_sample(&sample) {
            Ok(SampleOutcome::Classified { state, smoothed }) => {
                inner
                    .aggregator
                    .record_classification(state.movement(), smoothed);
                metrics::record_classification(state.movement(), smoothed);
                self.tx.send_replace(state);
            }
            Ok(SampleOutcome::Calibrated { baseline }) => {
                info!(sensor_id = %self.sensor_id, baseline, "Baseline established");
                metrics::record_calibration_completed(baseline);
            }
            Ok(SampleOutcome::Calibrating { .. }) | Ok(SampleOutcome::Ignored) => {}
            Err(ContractError::InvalidSample { field, value }) => {
                inner.aggregator.record_rejected();
                metrics::record_sample_rejected(&self.sensor_id, field);
                warn!(sensor_id = %self.sensor_id, field, value, "Discarding invalid sample");
            }
            Err(e) => {
                warn!(sensor_id = %self.sensor_id, error = %e, "Sample handling failed");
            }
        }
    }
}

/// Motion tracker
///
/// # Example
///
/// ```ignore
/// let mut tracker = MotionTracker::new(source, config.classifier.clone());
/// tracker.start()?;
/// let mut changes = tracker.changes();
/// while changes.changed().await.is_ok() {
///     let state = *changes.borrow_and_update();
///     // ...
/// }
/// tracker.stop();
/// ```
pub struct MotionTracker {
    source: Arc<dyn SensorSource>,
    shared: Arc<Shared>,
    subscription: Option<Subscription>,
    last_session: u64,
    clock: Arc<dyn Clock>,
    started_at_ms: u64,
    last_duration_ms: u64,
}

impl MotionTracker {
    pub fn new(source: Arc<dyn SensorSource>, config: ClassifierConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock::new()))
    }

    /// Create a tracker that measures session durations with `clock`
    pub fn with_clock(
        source: Arc<dyn SensorSource>,
        config: ClassifierConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (tx, _rx) = watch::channel(MovementState::initial());
        let shared = Shared {
            sensor_id: source.sensor_id().to_string(),
            inner: Mutex::new(Inner {
                classifier: Classifier::new(config),
                session: NO_SESSION,
                aggregator: ClassificationAggregator::new(),
            }),
            tx,
        };

        Self {
            source,
            shared: Arc::new(shared),
            subscription: None,
            last_session: NO_SESSION,
            clock,
            started_at_ms: 0,
            last_duration_ms: 0,
        }
    }

    pub fn sensor_id(&self) -> &str {
        &self.shared.sensor_id
    }

    /// Subscribe to the sensor and begin calibrating
    ///
    /// No-op while a session is active. On `SubscriptionFailure` the tracker
    /// stays inactive.
    #[instrument(name = "motion_tracker_start", skip(self), fields(sensor_id = %self.shared.sensor_id))]
    pub fn start(&mut self) -> Result<(), ContractError> {
        if self.subscription.is_some() {
            debug!("Tracker already active");
            return Ok(());
        }

        self.last_session += 1;
        let session = self.last_session;
        let interval = {
            let mut inner = self.shared.lock();
            inner.classifier.begin();
            inner.session = session;
            inner.aggregator.reset();
            inner.classifier.config().update_interval()
        };

        self.source.set_update_interval(interval);

        let shared = Arc::clone(&self.shared);
        let callback = Arc::new(move |sample: Sample| shared.handle(session, sample));

        match self.source.subscribe(callback) {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.started_at_ms = self.clock.now_ms();
                metrics::record_session_started();
                info!(session, interval_ms = interval.as_millis() as u64, "Tracking session started");
                Ok(())
            }
            Err(e) => {
                {
                    let mut inner = self.shared.lock();
                    inner.session = NO_SESSION;
                    inner.classifier.reset();
                }
                metrics::record_subscription_failure(&self.shared.sensor_id);
                warn!(error = %e, "Sensor subscription failed");
                Err(e)
            }
        }
    }

    /// Release the sensor and reset to the default state
    ///
    /// Idempotent.
    #[instrument(name = "motion_tracker_stop", skip(self), fields(sensor_id = %self.shared.sensor_id))]
    pub fn stop(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };

        {
            let mut inner = self.shared.lock();
            inner.session = NO_SESSION;
            inner.classifier.reset();
            self.shared.tx.send_replace(MovementState::initial());
        }

        // Released outside the lock; a source callback may be waiting on it.
        subscription.cancel();

        let duration_ms = self.clock.now_ms().saturating_sub(self.started_at_ms);
        self.last_duration_ms = duration_ms;
        metrics::record_session_ended(duration_ms);
        info!(duration_ms, "Tracking session stopped");
    }

    /// Latest published state
    pub fn state(&self) -> MovementState {
        *self.shared.tx.borrow()
    }

    /// Receiver notified on every published state
    pub fn changes(&self) -> watch::Receiver<MovementState> {
        self.shared.tx.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().classifier.phase()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn baseline(&self) -> Option<f64> {
        self.shared.lock().classifier.baseline()
    }

    pub fn calibration_progress(&self) -> f64 {
        self.shared.lock().classifier.calibration_progress()
    }

    /// Elapsed time of the active session, or the length of the last one
    pub fn session_duration_ms(&self) -> u64 {
        if self.is_active() {
            self.clock.now_ms().saturating_sub(self.started_at_ms)
        } else {
            self.last_duration_ms
        }
    }

    /// Statistics of the current (or last) session
    pub fn summary(&self) -> ClassificationSummary {
        self.shared.lock().aggregator.summary()
    }
}

impl Drop for MotionTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
