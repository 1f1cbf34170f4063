//! SensorSource trait - Sensor data source abstraction
//!
//! Decouples the motion classifier from concrete accelerometers. Real
//! devices, mock generators, recordings and hand-driven test sources all
//! implement the same subscription interface.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::{ContractError, Sample};

/// Sample callback type
///
/// Invoked once per produced sample, on whatever thread the source uses.
pub type SampleCallback = Arc<dyn Fn(Sample) + Send + Sync>;

/// Sensor data source trait
///
/// # Example
///
/// ```ignore
/// source.set_update_interval(Duration::from_millis(100));
/// let subscription = source.subscribe(Arc::new(|sample| {
///     println!("x = {}", sample.x);
/// }))?;
/// // ... session runs ...
/// subscription.cancel();
/// ```
pub trait SensorSource: Send + Sync {
    /// Get sensor ID
    fn sensor_id(&self) -> &str;

    /// Request a delivery interval
    ///
    /// Delivery is only approximately periodic; consumers must not rely on
    /// exact spacing.
    fn set_update_interval(&self, interval: Duration);

    /// Register the sample callback
    ///
    /// A source serves one subscriber at a time; subscribing while a
    /// subscription is live fails with `SubscriptionFailure`.
    fn subscribe(&self, callback: SampleCallback) -> Result<Subscription, ContractError>;

    /// Check if a subscription is currently live
    fn is_listening(&self) -> bool;
}

/// Live subscription guard
///
/// Releases the source on `cancel()` or on drop, whichever comes first.
pub struct Subscription {
    sensor_id: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a release action for `sensor_id`
    pub fn new(sensor_id: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            release: Some(Box::new(release)),
        }
    }

    pub fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    /// End the subscription now
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("sensor_id", &self.sensor_id)
            .field("live", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cancel_releases_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let subscription = Subscription::new("accel", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(subscription.sensor_id(), "accel");
        subscription.cancel();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        {
            let _subscription = Subscription::new("accel", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
