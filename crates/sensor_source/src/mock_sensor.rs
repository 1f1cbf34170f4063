//! Mock sensor implementation
//!
//! Implements `SensorSource` trait, generates simulated accelerometer data
//! following a [`MotionProfile`]. Used for demos and development without a
//! physical device.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use contracts::{ContractError, Sample, SampleCallback, SensorSource, Subscription};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::worker::spawn_or_release;
use crate::profile::MotionProfile;

/// Mock sensor configuration
#[derive(Debug, Clone)]
pub struct MockSensorConfig {
    /// Tilt script
    pub profile: MotionProfile,
    /// Uniform noise amplitude added to x
    pub noise: f64,
    /// RNG seed
    pub seed: u64,
    /// Gravity component reported on z
    pub gravity_z: f64,
}

impl Default for MockSensorConfig {
    fn default() -> Self {
        Self {
            profile: MotionProfile::sweep(),
            noise: 0.02,
            seed: 7,
            gravity_z: -1.0,
        }
    }
}

/// Mock sensor
///
/// Generates samples at the requested interval in a background thread.
/// Data is sent through the callback, like a real accelerometer listener.
pub struct MockSensor {
    sensor_id: String,
    config: MockSensorConfig,
    interval_ms: Arc<AtomicU64>,
    listening: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl MockSensor {
    /// Create new Mock sensor
    pub fn new(sensor_id: impl Into<String>, config: MockSensorConfig) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            config,
            interval_ms: Arc::new(AtomicU64::new(100)),
            listening: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create Mock sensor with default configuration
    pub fn with_defaults(sensor_id: impl Into<String>) -> Self {
        Self::new(sensor_id, MockSensorConfig::default())
    }

    /// Generate the sample for tick `index`
    fn generate_sample(
        config: &MockSensorConfig,
        rng: &mut StdRng,
        index: u64,
        timestamp: u64,
    ) -> Sample {
        let noise = if config.noise > 0.0 {
            rng.random_range(-config.noise..=config.noise)
        } else {
            0.0
        };
        Sample::new(
            config.profile.x_at(index) + noise,
            0.0,
            config.gravity_z,
            timestamp,
        )
    }
}

impl SensorSource for MockSensor {
    fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    fn set_update_interval(&self, interval: Duration) {
        let ms = (interval.as_millis() as u64).max(1);
        self.interval_ms.store(ms, Ordering::SeqCst);
    }

    fn subscribe(&self, callback: SampleCallback) -> Result<Subscription, ContractError> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(ContractError::subscription_failure(
                &self.sensor_id,
                "already subscribed",
            ));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let sensor_id = self.sensor_id.clone();
        let config = self.config.clone();
        let listening = self.listening.clone();
        let current = self.generation.clone();
        let interval_ms = self.interval_ms.clone();

        let is_live = {
            let listening = listening.clone();
            let current = current.clone();
            move || {
                listening.load(Ordering::SeqCst) && current.load(Ordering::SeqCst) == generation
            }
        };

        let thread_name = format!("mock-{sensor_id}");
        spawn_or_release(&self.sensor_id, &self.listening, || {
            thread::Builder::new().name(thread_name).spawn({
                let sensor_id = sensor_id.clone();
                move || {
                    let mut rng = StdRng::seed_from_u64(config.seed);
                    let start_time = Instant::now();
                    let mut index: u64 = 0;

                    debug!(
                        sensor_id = %sensor_id,
                        interval_ms = interval_ms.load(Ordering::Relaxed),
                        profile = %config.profile,
                        "mock sensor started"
                    );

                    while is_live() {
                        let timestamp = start_time.elapsed().as_millis() as u64;
                        let sample = Self::generate_sample(&config, &mut rng, index, timestamp);
                        callback(sample);

                        trace!(sensor_id = %sensor_id, index, x = sample.x, "mock sample sent");

                        index += 1;
                        thread::sleep(Duration::from_millis(interval_ms.load(Ordering::Relaxed)));
                    }

                    debug!(sensor_id = %sensor_id, samples = index, "mock sensor stopped");
                }
            })
        })?;

        Ok(Subscription::new(sensor_id, move || {
            if current.load(Ordering::SeqCst) == generation {
                listening.store(false, Ordering::SeqCst);
            }
        }))
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}
