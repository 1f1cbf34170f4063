//! Delivery thread startup shared by the threaded sources.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use contracts::ContractError;
use tracing::warn;

/// Run `spawn` for a source whose `listening` flag was just claimed
///
/// On failure the flag is released again, so a later `subscribe` can retry
/// instead of being rejected as already subscribed. The thread is detached.
pub(crate) fn spawn_or_release<F>(
    sensor_id: &str,
    listening: &AtomicBool,
    spawn: F,
) -> Result<(), ContractError>
where
    F: FnOnce() -> io::Result<JoinHandle<()>>,
{
    match spawn() {
        Ok(_handle) => Ok(()),
        Err(e) => {
            listening.store(false, Ordering::SeqCst);
            warn!(sensor_id, error = %e, "Failed to spawn delivery thread");
            Err(ContractError::subscription_failure(sensor_id, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_spawn_failure_releases_flag() {
        let listening = AtomicBool::new(true);

        let err = spawn_or_release("accel", &listening, || {
            Err(io::Error::new(io::ErrorKind::OutOfMemory, "no threads left"))
        })
        .unwrap_err();

        assert!(matches!(err, ContractError::SubscriptionFailure { .. }));
        assert!(err.to_string().contains("no threads left"));
        assert!(!listening.load(Ordering::SeqCst));
    }

    #[test]
    fn test_spawn_success_keeps_flag() {
        let listening = AtomicBool::new(true);

        spawn_or_release("accel", &listening, || thread::Builder::new().spawn(|| {})).unwrap();

        assert!(listening.load(Ordering::SeqCst));
    }
}
