//! Capture service
//!
//! Accepts start/stop and yields a media handle. Encoding and persistence
//! belong to the platform implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SessionError};

/// Handle to a finished recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHandle {
    pub uri: String,
}

/// Capture service trait
pub trait CaptureService: Send {
    /// Begin recording; the platform stops by itself after `max_duration`
    fn start(&mut self, max_duration: Duration) -> Result<()>;

    /// Finish recording and hand over the media
    fn stop(&mut self) -> Result<MediaHandle>;

    fn is_capturing(&self) -> bool;
}

/// In-process capture that produces numbered URIs
#[derive(Debug)]
pub struct SimulatedCapture {
    prefix: String,
    capturing: bool,
    recordings: u64,
    fail_next_start: Option<String>,
}

impl SimulatedCapture {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            capturing: false,
            recordings: 0,
            fail_next_start: None,
        }
    }

    /// Make the next `start` fail with `message`
    pub fn fail_next_start(&mut self, message: impl Into<String>) {
        self.fail_next_start = Some(message.into());
    }

    /// Number of completed recordings
    pub fn recordings(&self) -> u64 {
        self.recordings
    }
}

impl Default for SimulatedCapture {
    fn default() -> Self {
        Self::new("memory://recording")
    }
}

impl CaptureService for SimulatedCapture {
    fn start(&mut self, max_duration: Duration) -> Result<()> {
        if let Some(message) = self.fail_next_start.take() {
            return Err(SessionError::capture(message));
        }
        if self.capturing {
            return Err(SessionError::capture("capture already running"));
        }
        self.capturing = true;
        debug!(max_duration_ms = max_duration.as_millis() as u64, "Capture started");
        Ok(())
    }

    fn stop(&mut self) -> Result<MediaHandle> {
        if !self.capturing {
            return Err(SessionError::capture("capture not running"));
        }
        self.capturing = false;
        self.recordings += 1;
        let uri = format!("{}-{}.mp4", self.prefix, self.recordings);
        debug!(uri = %uri, "Capture stopped");
        Ok(MediaHandle { uri })
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }
}
