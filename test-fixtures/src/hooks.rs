use std::sync::atomic::{AtomicUsize, Ordering};

use sift_core::errors::{SchedulerError, SiftError};
use sift_core::traits::IMaintenanceHook;

/// Maintenance hook that counts invocations and optionally fails.
pub struct RecordingHook {
    touched: usize,
    fail: bool,
    calls: AtomicUsize,
}

impl RecordingHook {
    pub fn new(touched: usize) -> Self {
        Self {
            touched,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            touched: 0,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IMaintenanceHook for RecordingHook {
    fn run(&self) -> Result<usize, SiftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SchedulerError::HookFailed {
                reason: "tier promotion unavailable".into(),
            }
            .into());
        }
        Ok(self.touched)
    }

    fn name(&self) -> &str {
        "recording"
    }
}
