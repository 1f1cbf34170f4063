//! Manual sensor implementation
//!
//! Implements `SensorSource` without any thread: `emit` hands the sample to
//! the live callback on the caller's thread. Used to drive the classifier
//! deterministically from tests and synchronous replays.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use contracts::{ContractError, Sample, SampleCallback, SensorSource, Subscription};
use tracing::debug;

#[derive(Default)]
struct ManualState {
    callback: Option<SampleCallback>,
    generation: u64,
    interval: Option<Duration>,
    subscribe_count: usize,
    fail_next: Option<String>,
    clock_ms: u64,
}

/// Manual sensor
pub struct ManualSensor {
    sensor_id: String,
    state: Arc<Mutex<ManualState>>,
}

impl ManualSensor {
    /// Create new manual sensor
    pub fn new(sensor_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            state: Arc::new(Mutex::new(ManualState::default())),
        }
    }

    /// Deliver one sample to the live subscriber
    ///
    /// Returns `false` when nobody is subscribed.
    pub fn emit(&self, sample: Sample) -> bool {
        // Clone the callback out so it runs without holding our lock.
        let callback = lock(&self.state).callback.clone();
        match callback {
            Some(callback) => {
                callback(sample);
                true
            }
            None => false,
        }
    }

    /// Deliver lateral-only samples spaced by the requested interval
    ///
    /// Returns how many were delivered.
    pub fn emit_x(&self, xs: &[f64]) -> usize {
        let mut delivered = 0;
        for &x in xs {
            let timestamp = self.next_timestamp();
            if self.emit(Sample::lateral(x, timestamp)) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Make the next `subscribe` call fail
    pub fn fail_next_subscribe(&self, message: impl Into<String>) {
        lock(&self.state).fail_next = Some(message.into());
    }

    /// Interval last requested by the consumer
    pub fn update_interval(&self) -> Option<Duration> {
        lock(&self.state).interval
    }

    /// Number of successful subscriptions so far
    pub fn subscribe_count(&self) -> usize {
        lock(&self.state).subscribe_count
    }

    fn next_timestamp(&self) -> u64 {
        let mut state = lock(&self.state);
        let step = state.interval.map(|d| d.as_millis() as u64).unwrap_or(100);
        let timestamp = state.clock_ms;
        state.clock_ms += step;
        timestamp
    }
}

impl SensorSource for ManualSensor {
    fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    fn set_update_interval(&self, interval: Duration) {
        lock(&self.state).interval = Some(interval);
    }

    fn subscribe(&self, callback: SampleCallback) -> Result<Subscription, ContractError> {
        let mut state = lock(&self.state);

        if let Some(message) = state.fail_next.take() {
            return Err(ContractError::subscription_failure(&self.sensor_id, message));
        }
        if state.callback.is_some() {
            return Err(ContractError::subscription_failure(
                &self.sensor_id,
                "already subscribed",
            ));
        }

        state.generation += 1;
        state.subscribe_count += 1;
        state.callback = Some(callback);
        let generation = state.generation;

        debug!(sensor_id = %self.sensor_id, generation, "manual sensor subscribed");

        let shared = self.state.clone();
        Ok(Subscription::new(self.sensor_id.clone(), move || {
            let mut state = lock(&shared);
            if state.generation == generation {
                state.callback = None;
            }
        }))
    }

    fn is_listening(&self) -> bool {
        lock(&self.state).callback.is_some()
    }
}

fn lock(state: &Mutex<ManualState>) -> MutexGuard<'_, ManualState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
