//! Automatic threshold optimization.
//!
//! One run picks a strategy by comparing observed effectiveness with the
//! target, then moves the thresholds one step. Each direction has its own
//! bounds: loosening stops at a floor, tightening at a ceiling, and no step
//! ever moves a threshold the wrong way.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sift_core::config::OptimizationConfig;
use sift_core::constants::MAX_OPTIMIZATION_RECORDS;
use sift_core::models::{Domain, ThresholdConfig};
use tracing::info;

use crate::effectiveness::EffectivenessTracker;

/// Lowest base threshold `increase_sensitivity` will set.
pub const INCREASE_BASE_FLOOR: f64 = 0.7;
/// Lowest domain threshold `increase_sensitivity` will set.
pub const INCREASE_DOMAIN_FLOOR: f64 = 0.6;
/// Highest base threshold `decrease_sensitivity` will set.
pub const DECREASE_BASE_CEILING: f64 = 0.98;
/// Highest domain threshold `decrease_sensitivity` will set.
pub const DECREASE_DOMAIN_CEILING: f64 = 0.99;
/// Lowest code threshold `fine_tune` will set.
pub const FINE_TUNE_CODE_FLOOR: f64 = 0.75;

/// Below `target * LOW_RATIO` → increase sensitivity.
const LOW_RATIO: f64 = 0.7;
/// Above `target * HIGH_RATIO` → decrease sensitivity.
const HIGH_RATIO: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Lower thresholds to catch more duplicates.
    IncreaseSensitivity,
    /// Raise thresholds to avoid false positives.
    DecreaseSensitivity,
    /// Half-step on the code domain only.
    FineTune,
}

impl Strategy {
    pub fn choose(effectiveness: f64, target: f64) -> Self {
        if effectiveness < target * LOW_RATIO {
            Self::IncreaseSensitivity
        } else if effectiveness > target * HIGH_RATIO {
            Self::DecreaseSensitivity
        } else {
            Self::FineTune
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncreaseSensitivity => "increase_sensitivity",
            Self::DecreaseSensitivity => "decrease_sensitivity",
            Self::FineTune => "fine_tune",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a run's effectiveness figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectivenessSource {
    External,
    Tracker,
    Cumulative,
    None,
}

/// Lifetime dedup counters, the fallback effectiveness input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeStats {
    pub duplicates_found: u64,
    pub documents_removed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// `base_threshold` or `domain_thresholds.<domain>`.
    pub field: String,
    pub old: f64,
    pub new: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub timestamp: DateTime<Utc>,
    pub effectiveness: f64,
    pub source: EffectivenessSource,
    pub strategy: Strategy,
    pub adjustments: Vec<Adjustment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OptimizationOutcome {
    Disabled,
    Optimized {
        record: OptimizationRecord,
        next_optimization: DateTime<Utc>,
    },
}

impl OptimizationOutcome {
    pub fn adjustments(&self) -> &[Adjustment] {
        match self {
            Self::Optimized { record, .. } => &record.adjustments,
            Self::Disabled => &[],
        }
    }
}

/// Sole writer of `ThresholdConfig`.
#[derive(Debug, Clone)]
pub struct ThresholdOptimizer {
    config: OptimizationConfig,
    history: VecDeque<OptimizationRecord>,
    last_run: Option<DateTime<Utc>>,
}

impl ThresholdOptimizer {
    pub fn new(config: OptimizationConfig) -> Self {
        Self {
            config,
            history: VecDeque::with_capacity(MAX_OPTIMIZATION_RECORDS),
            last_run: None,
        }
    }

    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    pub fn history(&self) -> impl Iterator<Item = &OptimizationRecord> {
        self.history.iter()
    }

    pub fn optimization_count(&self) -> usize {
        self.history.len()
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    fn interval(&self) -> Duration {
        Duration::hours(self.config.interval_hours.min(i32::MAX as u64) as i64)
    }

    /// `last_run + interval`; `None` before the first run.
    pub fn next_optimization_time(&self) -> Option<DateTime<Utc>> {
        self.last_run.map(|t| t + self.interval())
    }

    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.config.enabled && self.next_optimization_time().map_or(true, |next| now >= next)
    }

    /// Resolve the effectiveness input: external figure, then tracker mean
    /// over the performance window, then the cumulative removed/found ratio.
    ///
    /// External figures above 1 are read as percentages.
    pub fn effectiveness_input(
        &self,
        external: Option<f64>,
        tracker: &EffectivenessTracker,
        cumulative: CumulativeStats,
        now: DateTime<Utc>,
    ) -> (f64, EffectivenessSource) {
        if let Some(value) = external.filter(|v| v.is_finite()) {
            let value = if value > 1.0 { value / 100.0 } else { value };
            return (value.clamp(0.0, 1.0), EffectivenessSource::External);
        }
        if let Some(mean) = tracker.window_mean(self.config.performance_window_hours, now) {
            return (mean, EffectivenessSource::Tracker);
        }
        if cumulative.duplicates_found > 0 {
            let ratio = cumulative.documents_removed as f64 / cumulative.duplicates_found as f64;
            return (ratio.clamp(0.0, 1.0), EffectivenessSource::Cumulative);
        }
        (0.0, EffectivenessSource::None)
    }

    pub fn optimize(
        &mut self,
        thresholds: &mut ThresholdConfig,
        tracker: &EffectivenessTracker,
        external: Option<f64>,
        cumulative: CumulativeStats,
    ) -> OptimizationOutcome {
        self.optimize_at(thresholds, tracker, external, cumulative, Utc::now())
    }

    pub fn optimize_at(
        &mut self,
        thresholds: &mut ThresholdConfig,
        tracker: &EffectivenessTracker,
        external: Option<f64>,
        cumulative: CumulativeStats,
        now: DateTime<Utc>,
    ) -> OptimizationOutcome {
        if !self.config.enabled {
            return OptimizationOutcome::Disabled;
        }

        let (effectiveness, source) = self.effectiveness_input(external, tracker, cumulative, now);
        let strategy = Strategy::choose(effectiveness, self.config.effectiveness_target);
        let adjustments = apply_strategy(strategy, thresholds, self.config.adjustment_step);

        for adj in &adjustments {
            info!(
                field = %adj.field,
                old = adj.old,
                new = adj.new,
                strategy = %strategy,
                "threshold adjustment"
            );
        }

        let record = OptimizationRecord {
            timestamp: now,
            effectiveness,
            source,
            strategy,
            adjustments,
        };
        self.history.push_back(record.clone());
        while self.history.len() > MAX_OPTIMIZATION_RECORDS {
            self.history.pop_front();
        }
        self.last_run = Some(now);

        OptimizationOutcome::Optimized {
            record,
            next_optimization: now + self.interval(),
        }
    }
}

/// Apply one step of `strategy`, returning every field that changed.
fn apply_strategy(strategy: Strategy, thresholds: &mut ThresholdConfig, step: f64) -> Vec<Adjustment> {
    let mut adjustments = Vec::new();
    let domains: Vec<Domain> = thresholds.domain_thresholds().keys().copied().collect();

    match strategy {
        Strategy::IncreaseSensitivity => {
            let old = thresholds.base_threshold();
            let new = thresholds.set_base_threshold(lower(old, step, INCREASE_BASE_FLOOR));
            push_if_changed(&mut adjustments, "base_threshold".into(), old, new);
            for domain in domains {
                adjust_domain(&mut adjustments, thresholds, domain, |old| {
                    lower(old, step, INCREASE_DOMAIN_FLOOR)
                });
            }
        }
        Strategy::DecreaseSensitivity => {
            let old = thresholds.base_threshold();
            let new = thresholds.set_base_threshold(raise(old, step, DECREASE_BASE_CEILING));
            push_if_changed(&mut adjustments, "base_threshold".into(), old, new);
            for domain in domains {
                adjust_domain(&mut adjustments, thresholds, domain, |old| {
                    raise(old, step, DECREASE_DOMAIN_CEILING)
                });
            }
        }
        Strategy::FineTune => {
            if domains.contains(&Domain::Code) {
                adjust_domain(&mut adjustments, thresholds, Domain::Code, |old| {
                    lower(old, step / 2.0, FINE_TUNE_CODE_FLOOR)
                });
            }
        }
    }
    adjustments
}

fn adjust_domain(
    adjustments: &mut Vec<Adjustment>,
    thresholds: &mut ThresholdConfig,
    domain: Domain,
    step: impl Fn(f64) -> f64,
) {
    if let Some(old) = thresholds.domain_threshold(domain) {
        let new = thresholds.set_domain_threshold(domain, step(old));
        push_if_changed(adjustments, format!("domain_thresholds.{domain}"), old, new);
    }
}

fn push_if_changed(adjustments: &mut Vec<Adjustment>, field: String, old: f64, new: f64) {
    if new != old {
        adjustments.push(Adjustment { field, old, new });
    }
}

/// `old - step`, not below `floor`, never above `old`.
fn lower(old: f64, step: f64, floor: f64) -> f64 {
    (old - step).max(floor).min(old)
}

/// `old + step`, not above `ceiling`, never below `old`.
fn raise(old: f64, step: f64, ceiling: f64) -> f64 {
    (old + step).min(ceiling).max(old)
}
