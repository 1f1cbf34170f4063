//! Baseline calibration.

/// Running average of the first `target` raw x readings of a session
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    accumulated_x: f64,
    sample_count: usize,
    target: usize,
}

impl Calibration {
    /// `target` is clamped to at least one sample
    pub fn new(target: usize) -> Self {
        Self {
            accumulated_x: 0.0,
            sample_count: 0,
            target: target.max(1),
        }
    }

    /// Add one raw reading
    ///
    /// Returns the baseline on the sample that completes calibration.
    pub fn push(&mut self, x: f64) -> Option<f64> {
        self.accumulated_x += x;
        self.sample_count += 1;

        if self.sample_count >= self.target {
            Some(self.accumulated_x / self.sample_count as f64)
        } else {
            None
        }
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Fraction of calibration done, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.sample_count as f64 / self.target as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_is_mean_of_target_samples() {
        let mut cal = Calibration::new(4);
        assert_eq!(cal.push(0.1), None);
        assert_eq!(cal.push(0.2), None);
        assert_eq!(cal.push(0.3), None);

        let baseline = cal.push(0.4).unwrap();
        assert!((baseline - 0.25).abs() < 1e-12);
        assert_eq!(cal.sample_count(), 4);
    }

    #[test]
    fn test_single_sample_calibration() {
        let mut cal = Calibration::new(1);
        assert_eq!(cal.push(-0.07), Some(-0.07));
    }

    #[test]
    fn test_zero_target_clamped() {
        let cal = Calibration::new(0);
        assert_eq!(cal.target(), 1);
    }

    #[test]
    fn test_progress() {
        let mut cal = Calibration::new(4);
        assert_eq!(cal.progress(), 0.0);
        cal.push(0.0);
        assert!((cal.progress() - 0.25).abs() < 1e-12);
    }
}
