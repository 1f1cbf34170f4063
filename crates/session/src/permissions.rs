//! Camera and microphone permissions
//!
//! Real platforms negotiate access asynchronously; here a provider answers
//! `check` (current grants) and `request` (ask the user, then report).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Current grants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    pub camera: bool,
    pub microphone: bool,
}

impl PermissionState {
    pub fn granted() -> Self {
        Self {
            camera: true,
            microphone: true,
        }
    }

    pub fn all_granted(&self) -> bool {
        self.camera && self.microphone
    }
}

/// Permission provider trait
pub trait PermissionProvider: Send + Sync {
    /// Report current grants without prompting
    fn check(&self) -> Result<PermissionState>;

    /// Prompt for missing grants, then report
    fn request(&self) -> Result<PermissionState>;
}

/// Provider with fixed answers
///
/// `check` reports the initial state until a `request` succeeds; after that
/// it reports what the request granted.
#[derive(Debug)]
pub struct StaticPermissions {
    initial: PermissionState,
    on_request: PermissionState,
    requested: AtomicBool,
    request_count: AtomicUsize,
}

impl StaticPermissions {
    pub fn new(initial: PermissionState, on_request: PermissionState) -> Self {
        Self {
            initial,
            on_request,
            requested: AtomicBool::new(false),
            request_count: AtomicUsize::new(0),
        }
    }

    /// Everything already granted
    pub fn granted() -> Self {
        Self::new(PermissionState::granted(), PermissionState::granted())
    }

    /// Nothing granted, and requests are refused
    pub fn denied() -> Self {
        Self::new(PermissionState::default(), PermissionState::default())
    }

    /// Nothing granted until requested
    pub fn grant_on_request() -> Self {
        Self::new(PermissionState::default(), PermissionState::granted())
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl PermissionProvider for StaticPermissions {
    fn check(&self) -> Result<PermissionState> {
        if self.requested.load(Ordering::SeqCst) {
            Ok(self.on_request)
        } else {
            Ok(self.initial)
        }
    }

    fn request(&self) -> Result<PermissionState> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requested.store(true, Ordering::SeqCst);
        Ok(self.on_request)
    }
}
