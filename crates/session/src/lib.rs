//! # Session
//!
//! Recording session around the motion tracker.
//!
//! - [`PermissionProvider`]: camera and microphone grants
//! - [`CaptureService`]: video capture start/stop
//! - [`FeedbackEvaluator`]: movement vs. target direction
//! - [`SessionController`]: gates the tracker with a recording

pub mod capture;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod permissions;

pub use capture::{CaptureService, MediaHandle, SimulatedCapture};
pub use controller::{RecordingState, RecordingSummary, SessionController, SessionEvent};
pub use error::{Result, SessionError};
pub use feedback::{Cue, Feedback, FeedbackEvaluator};
pub use permissions::{PermissionProvider, PermissionState, StaticPermissions};
