//! Record every phase failure: phase, collection, message, timestamp, recovery status.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sift_core::constants::MAX_TRACKED_FAILURES;
use sift_core::models::CleanupPhase;

use crate::tracing_setup::events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// The phase has not succeeded since.
    Active,
    /// A later run of the phase succeeded.
    Recovered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseFailure {
    pub phase: CleanupPhase,
    /// Collection being processed, when the failure was collection-scoped.
    pub collection: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Bounded log of phase failures; the oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct FailureTracker {
    capacity: usize,
    failures: VecDeque<PhaseFailure>,
}

impl Default for FailureTracker {
    fn default() -> Self {
        Self::new(MAX_TRACKED_FAILURES)
    }
}

impl FailureTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            failures: VecDeque::new(),
        }
    }

    pub fn record_at(
        &mut self,
        phase: CleanupPhase,
        collection: Option<&str>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        let message = message.into();
        events::phase_failed(phase, collection, &message);
        self.failures.push_back(PhaseFailure {
            phase,
            collection: collection.map(str::to_string),
            message,
            timestamp: now,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
        while self.failures.len() > self.capacity {
            self.failures.pop_front();
        }
    }

    /// Mark every active failure of `phase` recovered. Returns how many changed.
    pub fn mark_recovered(&mut self, phase: CleanupPhase, now: DateTime<Utc>) -> usize {
        let mut cleared = 0;
        for failure in self
            .failures
            .iter_mut()
            .filter(|f| f.phase == phase && f.recovery_status == RecoveryStatus::Active)
        {
            failure.recovery_status = RecoveryStatus::Recovered;
            failure.recovered_at = Some(now);
            cleared += 1;
        }
        if cleared > 0 {
            events::phase_recovered(phase, cleared);
        }
        cleared
    }

    pub fn failures(&self) -> impl Iterator<Item = &PhaseFailure> {
        self.failures.iter()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn active_failures(&self) -> Vec<&PhaseFailure> {
        self.failures
            .iter()
            .filter(|f| f.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn last_failure(&self, phase: CleanupPhase) -> Option<&PhaseFailure> {
        self.failures.iter().rev().find(|f| f.phase == phase)
    }

    /// Failures of `phase` in the last `window` ending at `now`.
    pub fn count_recent(&self, phase: CleanupPhase, window: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - window;
        self.failures
            .iter()
            .filter(|f| f.phase == phase && f.timestamp > cutoff)
            .count()
    }

    /// How long `phase` has been failing, `None` if it isn't.
    pub fn failing_for(&self, phase: CleanupPhase, now: DateTime<Utc>) -> Option<Duration> {
        let earliest = self
            .failures
            .iter()
            .filter(|f| f.phase == phase && f.recovery_status == RecoveryStatus::Active)
            .map(|f| f.timestamp)
            .min()?;
        Some(now - earliest)
    }
}
