//! Replay Sensor - replays recorded accelerometer samples
//!
//! Reads a JSONL recording (see [`crate::recording`]) and delivers the
//! samples at their original pace, scaled by a speed multiplier.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use contracts::{ContractError, Sample, SampleCallback, SensorSource, Subscription};
use tracing::{debug, info, warn};

use crate::worker::spawn_or_release;
use crate::recording::read_recording;

/// Replay configuration
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Replay speed multiplier (1.0 = original speed)
    pub speed_multiplier: f64,

    /// Loop when the recording ends
    pub loop_playback: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            loop_playback: false,
        }
    }
}

/// Replay Sensor
pub struct ReplaySensor {
    sensor_id: String,
    samples: Arc<Vec<Sample>>,
    config: ReplayConfig,
    interval_ms: Arc<AtomicU64>,
    listening: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl ReplaySensor {
    /// Load a recording from disk
    pub fn load(
        path: &Path,
        sensor_id: impl Into<String>,
        config: ReplayConfig,
    ) -> crate::Result<Self> {
        let samples = read_recording(path)?;
        Ok(Self::from_samples(sensor_id, samples, config))
    }

    /// Build a replay sensor from in-memory samples
    pub fn from_samples(
        sensor_id: impl Into<String>,
        samples: Vec<Sample>,
        config: ReplayConfig,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            samples: Arc::new(samples),
            config,
            interval_ms: Arc::new(AtomicU64::new(100)),
            listening: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Recorded samples in playback order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Delay before delivering `next` after `prev`
    ///
    /// Uses the recorded spacing; falls back to the requested interval when
    /// timestamps do not advance.
    fn pacing(prev: &Sample, next: &Sample, interval: Duration, speed: f64) -> Duration {
        let recorded = next.timestamp.saturating_sub(prev.timestamp);
        let base = if recorded > 0 {
            Duration::from_millis(recorded)
        } else {
            interval
        };
        base.div_f64(speed)
    }
}

impl SensorSource for ReplaySensor {
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
        let listening = self.listening.clone();
        let current = self.generation.clone();
        let samples = self.samples.clone();
        let interval_ms = self.interval_ms.clone();
        let sensor_id = self.sensor_id.clone();
        let speed = self.config.speed_multiplier.max(0.1);
        let loop_playback = self.config.loop_playback;

        let thread_listening = listening.clone();
        let thread_current = current.clone();
        let is_live = move || {
            thread_listening.load(Ordering::SeqCst)
                && thread_current.load(Ordering::SeqCst) == generation
        };

        let thread_sensor_id = sensor_id.clone();
        let thread_name = format!("replay-{sensor_id}");
        spawn_or_release(&self.sensor_id, &self.listening, || {
            thread::Builder::new().name(thread_name).spawn(move || {
                let sensor_id = thread_sensor_id;
                debug!(sensor_id = %sensor_id, "Replay thread started");

                'playback: loop {
                    if samples.is_empty() {
                        warn!(sensor_id = %sensor_id, "No samples to replay");
                        break;
                    }

                    let start_time = Instant::now();
                    let mut target_elapsed = Duration::ZERO;

                    for (idx, sample) in samples.iter().enumerate() {
                        if idx > 0 {
                            let interval =
                                Duration::from_millis(interval_ms.load(Ordering::Relaxed));
                            target_elapsed +=
                                Self::pacing(&samples[idx - 1], sample, interval, speed);
                            let actual_elapsed = start_time.elapsed();
                            if target_elapsed > actual_elapsed {
                                thread::sleep(target_elapsed - actual_elapsed);
                            }
                        }

                        if !is_live() {
                            debug!(sensor_id = %sensor_id, "Replay stopped");
                            break 'playback;
                        }
                        callback(*sample);
                    }

                    if !loop_playback {
                        info!(sensor_id = %sensor_id, "Replay completed");
                        break;
                    }
                    debug!(sensor_id = %sensor_id, "Looping replay");
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
