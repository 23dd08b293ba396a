//! Wall-clock budgets for maintenance phases.

use std::time::{Duration, Instant};

/// A wall-clock allowance measured from the moment the budget was created.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    start: Instant,
    allowance: Duration,
}

impl Budget {
    pub fn new(allowance: Duration) -> Self {
        Self {
            start: Instant::now(),
            allowance,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn allowance(&self) -> Duration {
        self.allowance
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.allowance.saturating_sub(self.elapsed())
    }

    pub fn is_exhausted(&self) -> bool {
        self.elapsed() >= self.allowance
    }

    /// A sub-budget starting now: `1/parts` of the allowance, capped by
    /// what this budget has left.
    pub fn share(&self, parts: usize) -> Budget {
        let parts = u32::try_from(parts.max(1)).unwrap_or(u32::MAX);
        Budget::new((self.allowance / parts).min(self.remaining()))
    }
}
