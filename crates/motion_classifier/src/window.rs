//! Fixed-capacity smoothing window over relative x.

use std::fmt;

use ringbuf::{traits::*, HeapRb};

/// Holds the most recent `capacity` relative-x values
///
/// The oldest value is overwritten once full. The mean is recomputed from
/// the stored values on every call, so no running-sum drift accumulates.
pub struct SmoothingWindow {
    values: HeapRb<f64>,
}

impl fmt::Debug for SmoothingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmoothingWindow")
            .field("len", &self.values.occupied_len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl SmoothingWindow {
    /// `capacity` is clamped to at least one value
    pub fn new(capacity: usize) -> Self {
        Self {
            values: HeapRb::new(capacity.max(1)),
        }
    }

    /// Append a value, evicting the oldest when full
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.values.push_overwrite(value);
    }

    /// Arithmetic mean of the stored values (0.0 when empty)
    pub fn mean(&self) -> f64 {
        let len = self.values.occupied_len();
        if len == 0 {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / len as f64
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.occupied_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity().get()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
