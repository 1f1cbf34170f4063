//! Recording session controller
//!
//! Starts and stops the motion tracker in lockstep with a recording. A
//! session is either fully up (permissions granted, tracker subscribed,
//! capture running) or fully down; a failure at any step of `begin` undoes
//! the steps before it.

use std::sync::Arc;

use contracts::{Clock, Direction, MovementState, SessionConfig, SystemClock, TargetPolicy};
use motion_classifier::MotionTracker;
use observability::ClassificationSummary;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::capture::{CaptureService, MediaHandle};
use crate::error::{Result, SessionError};
use crate::feedback::{Feedback, FeedbackEvaluator};
use crate::permissions::PermissionProvider;

/// Recording state shown by the UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingState {
    pub is_recording: bool,
    /// URI of the last finished recording
    pub video_uri: Option<String>,
    pub duration_ms: u64,
}

/// What a finished recording produced
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSummary {
    pub media: MediaHandle,
    pub duration_ms: u64,
    pub target: Direction,
    pub motion: ClassificationSummary,
}

/// Result of one `poll`
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// No recording in progress
    Idle,
    /// Feedback for the latest movement state
    Feedback(Feedback),
    /// The recording hit its maximum duration and was ended
    Ended(RecordingSummary),
}

struct ActiveRecording {
    target: Direction,
    started_at_ms: u64,
    evaluator: FeedbackEvaluator,
}

/// Session controller
pub struct SessionController {
    tracker: MotionTracker,
    permissions: Arc<dyn PermissionProvider>,
    capture: Box<dyn CaptureService>,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    active: Option<ActiveRecording>,
    last_video_uri: Option<String>,
}

impl SessionController {
    pub fn new(
        tracker: MotionTracker,
        permissions: Arc<dyn PermissionProvider>,
        capture: Box<dyn CaptureService>,
        config: SessionConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            tracker,
            permissions,
            capture,
            config,
            clock: Arc::new(SystemClock::new()),
            rng,
            active: None,
            last_video_uri: None,
        }
    }

    /// Use `clock` for recording durations
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Start a recording session
    ///
    /// Returns the direction the user is asked to move in.
    #[instrument(name = "session_begin", skip(self))]
    pub fn begin(&mut self) -> Result<Direction> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyRecording);
        }

        self.ensure_permissions()?;
        let target = self.pick_target();

        self.tracker.start()?;

        if let Err(e) = self.capture.start(self.config.max_duration()) {
            warn!(error = %e, "Capture failed to start, stopping tracker");
            self.tracker.stop();
            return Err(e);
        }

        self.active = Some(ActiveRecording {
            target,
            started_at_ms: self.clock.now_ms(),
            evaluator: FeedbackEvaluator::new(target),
        });
        info!(direction = %target, max_duration_ms = self.config.max_duration_ms, "Recording started");

        Ok(target)
    }

    /// End the recording session
    ///
    /// The tracker is stopped even when capture fails to stop.
    #[instrument(name = "session_end", skip(self))]
    pub fn end(&mut self) -> Result<RecordingSummary> {
        let active = self.active.take().ok_or(SessionError::NotRecording)?;
        let duration_ms = self.elapsed_since(active.started_at_ms);

        self.tracker.stop();
        let media = self.capture.stop()?;

        self.last_video_uri = Some(media.uri.clone());
        info!(uri = %media.uri, duration_ms, "Recording finished");

        Ok(RecordingSummary {
            media,
            duration_ms,
            target: active.target,
            motion: self.tracker.summary(),
        })
    }

    /// Evaluate the latest movement and enforce the duration limit
    pub fn poll(&mut self) -> Result<SessionEvent> {
        let state = self.tracker.state();
        let now = self.clock.now_ms();

        let Some(active) = self.active.as_mut() else {
            return Ok(SessionEvent::Idle);
        };

        if now.saturating_sub(active.started_at_ms) >= self.config.max_duration_ms {
            info!(max_duration_ms = self.config.max_duration_ms, "Maximum duration reached");
            return self.end().map(SessionEvent::Ended);
        }

        Ok(SessionEvent::Feedback(active.evaluator.evaluate(&state)))
    }

    fn ensure_permissions(&self) -> Result<()> {
        let mut state = self.permissions.check()?;
        if !state.all_granted() && self.config.request_permissions {
            state = self.permissions.request()?;
        }

        if state.all_granted() {
            Ok(())
        } else {
            warn!(camera = state.camera, microphone = state.microphone, "Permissions missing");
            Err(SessionError::PermissionDenied {
                camera: state.camera,
                microphone: state.microphone,
            })
        }
    }

    fn pick_target(&mut self) -> Direction {
        match self.config.target {
            TargetPolicy::Fixed(direction) => direction,
            TargetPolicy::Random => Direction::ALL[self.rng.random_range(0..Direction::ALL.len())],
        }
    }

    fn elapsed_since(&self, started_at_ms: u64) -> u64 {
        self.clock.now_ms().saturating_sub(started_at_ms)
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the current recording
    pub fn target(&self) -> Option<Direction> {
        self.active.as_ref().map(|a| a.target)
    }

    pub fn recording_state(&self) -> RecordingState {
        RecordingState {
            is_recording: self.active.is_some(),
            video_uri: self.last_video_uri.clone(),
            duration_ms: self
                .active
                .as_ref()
                .map_or(0, |a| self.elapsed_since(a.started_at_ms)),
        }
    }

    pub fn movement_state(&self) -> MovementState {
        self.tracker.state()
    }

    pub fn tracker(&self) -> &MotionTracker {
        &self.tracker
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if self.active.is_some() {
            if let Err(e) = self.end() {
                warn!(error = %e, "Failed to end recording on drop");
            }
        }
    }
}
