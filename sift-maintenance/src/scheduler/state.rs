//! Per-phase timer state.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sift_core::config::PhaseConfig;
use sift_core::models::CleanupPhase;

use crate::budget::Budget;

/// A century; keeps `last_run + interval` representable.
const MAX_INTERVAL_HOURS: u64 = 24 * 365 * 100;

pub(crate) fn hours(h: u64) -> Duration {
    Duration::hours(h.min(MAX_INTERVAL_HOURS) as i64)
}

/// Timer state of one phase. `last_run` only moves after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: CleanupPhase,
    pub enabled: bool,
    pub interval_hours: u64,
    pub max_processing_time_seconds: u64,
    pub last_run: DateTime<Utc>,
}

impl PhaseState {
    /// Anchor `last_run` so the first run falls `grace_hours` after `now`.
    pub fn anchored(phase: CleanupPhase, config: &PhaseConfig, grace_hours: u64, now: DateTime<Utc>) -> Self {
        let interval = hours(config.interval_hours);
        let grace = hours(grace_hours).min(interval);
        Self {
            phase,
            enabled: config.enabled,
            interval_hours: config.interval_hours,
            max_processing_time_seconds: config.max_processing_time_seconds,
            last_run: now - interval + grace,
        }
    }

    pub fn interval(&self) -> Duration {
        hours(self.interval_hours)
    }

    pub fn next_run(&self) -> DateTime<Utc> {
        self.last_run + self.interval()
    }

    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.enabled && now - self.last_run >= self.interval()
    }

    pub fn budget(&self) -> Budget {
        Budget::from_secs(self.max_processing_time_seconds)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> PhaseStatus {
        let next_run = self.next_run();
        let seconds_left = (next_run - now).num_seconds().max(0);
        PhaseStatus {
            phase: self.phase,
            enabled: self.enabled,
            interval_hours: self.interval_hours,
            last_run: self.last_run,
            next_run,
            hours_until_next: seconds_left as f64 / 3600.0,
            is_due: self.is_due_at(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseStatus {
    pub phase: CleanupPhase,
    pub enabled: bool,
    pub interval_hours: u64,
    pub last_run: DateTime<Utc>,
    pub next_run: DateTime<Utc>,
    pub hours_until_next: f64,
    pub is_due: bool,
}

/// `last_run` of every phase, for hosts that persist scheduler state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    pub last_runs: BTreeMap<CleanupPhase, DateTime<Utc>>,
}
