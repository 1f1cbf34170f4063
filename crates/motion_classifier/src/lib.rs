//! # Motion Classifier
//!
//! Turns a stream of accelerometer samples into a debounced
//! left / right / stationary classification.
//!
//! - Calibration: the first `calibration_count` raw x readings of a session
//!   are averaged into a baseline
//! - Smoothing: relative x (`x - baseline`) is averaged over the last
//!   `smoothing_window` readings
//! - Classification: strict movement threshold; everything at or below it
//!   is stationary
//!
//! ## Usage
//!
//! ```ignore
//! use motion_classifier::MotionTracker;
//!
//! let mut tracker = MotionTracker::new(source, config.classifier.clone());
//! tracker.start()?;
//! let state = tracker.state();
//! tracker.stop();
//! ```

mod calibration;
mod classifier;
mod tracker;
mod window;

pub use calibration::Calibration;
pub use classifier::{classify, Classifier, Phase, SampleOutcome};
pub use tracker::MotionTracker;
pub use window::SmoothingWindow;

pub use contracts::{ClassifierConfig, Movement, MovementState, Sample, SignConvention};
