use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::CleanupPhase;

/// Per-phase cleanup parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub enabled: bool,
    /// Minimum hours between two successful runs.
    pub interval_hours: u64,
    /// Wall-clock budget for one run of the phase.
    pub max_processing_time_seconds: u64,
    /// Base similarity threshold used by the phase's dedup passes.
    pub similarity_threshold: f64,
    /// Collections in scope, in processing order.
    pub collections: Vec<String>,
}

impl PhaseConfig {
    /// Built-in parameters for a phase.
    pub fn for_phase(phase: CleanupPhase) -> Self {
        let (interval_hours, max_secs, threshold, collections) = match phase {
            CleanupPhase::Daily => (
                defaults::DEFAULT_DAILY_INTERVAL_HOURS,
                defaults::DEFAULT_DAILY_MAX_SECS,
                defaults::DEFAULT_DAILY_THRESHOLD,
                defaults::DEFAULT_DAILY_COLLECTIONS,
            ),
            CleanupPhase::Weekly => (
                defaults::DEFAULT_WEEKLY_INTERVAL_HOURS,
                defaults::DEFAULT_WEEKLY_MAX_SECS,
                defaults::DEFAULT_WEEKLY_THRESHOLD,
                defaults::DEFAULT_WEEKLY_COLLECTIONS,
            ),
            CleanupPhase::Monthly => (
                defaults::DEFAULT_MONTHLY_INTERVAL_HOURS,
                defaults::DEFAULT_MONTHLY_MAX_SECS,
                defaults::DEFAULT_MONTHLY_THRESHOLD,
                defaults::DEFAULT_MONTHLY_COLLECTIONS,
            ),
        };
        Self {
            enabled: true,
            interval_hours,
            max_processing_time_seconds: max_secs,
            similarity_threshold: threshold,
            collections: collections.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Thresholds used by monthly insight generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Flag imbalance when one collection exceeds another by this factor.
    pub imbalance_ratio: f64,
    /// Flag effectiveness below this percentage.
    pub low_effectiveness_percent: f64,
    /// Flag total volume above this many documents.
    pub large_volume_threshold: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            imbalance_ratio: defaults::DEFAULT_IMBALANCE_RATIO,
            low_effectiveness_percent: defaults::DEFAULT_LOW_EFFECTIVENESS_PERCENT,
            large_volume_threshold: defaults::DEFAULT_LARGE_VOLUME_THRESHOLD,
        }
    }
}

/// Progressive cleanup configuration: three phases plus insights.
///
/// Phase tables may be partial; missing keys fall back to that phase's
/// own defaults rather than a shared default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawCleanupConfig")]
pub struct CleanupConfig {
    /// Hours of grace before the first run of each phase after startup.
    pub startup_grace_hours: u64,
    pub daily: PhaseConfig,
    pub weekly: PhaseConfig,
    pub monthly: PhaseConfig,
    pub insights: InsightConfig,
}

impl CleanupConfig {
    pub fn phase(&self, phase: CleanupPhase) -> &PhaseConfig {
        match phase {
            CleanupPhase::Daily => &self.daily,
            CleanupPhase::Weekly => &self.weekly,
            CleanupPhase::Monthly => &self.monthly,
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            startup_grace_hours: defaults::DEFAULT_STARTUP_GRACE_HOURS,
            daily: PhaseConfig::for_phase(CleanupPhase::Daily),
            weekly: PhaseConfig::for_phase(CleanupPhase::Weekly),
            monthly: PhaseConfig::for_phase(CleanupPhase::Monthly),
            insights: InsightConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCleanupConfig {
    startup_grace_hours: Option<u64>,
    daily: PhasePatch,
    weekly: PhasePatch,
    monthly: PhasePatch,
    insights: InsightConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PhasePatch {
    enabled: Option<bool>,
    interval_hours: Option<u64>,
    max_processing_time_seconds: Option<u64>,
    similarity_threshold: Option<f64>,
    collections: Option<Vec<String>>,
}

impl PhasePatch {
    fn apply(self, phase: CleanupPhase) -> PhaseConfig {
        let base = PhaseConfig::for_phase(phase);
        PhaseConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            interval_hours: self.interval_hours.unwrap_or(base.interval_hours),
            max_processing_time_seconds: self
                .max_processing_time_seconds
                .unwrap_or(base.max_processing_time_seconds),
            similarity_threshold: self.similarity_threshold.unwrap_or(base.similarity_threshold),
            collections: self.collections.unwrap_or(base.collections),
        }
    }
}

impl From<RawCleanupConfig> for CleanupConfig {
    fn from(raw: RawCleanupConfig) -> Self {
        Self {
            startup_grace_hours: raw
                .startup_grace_hours
                .unwrap_or(defaults::DEFAULT_STARTUP_GRACE_HOURS),
            daily: raw.daily.apply(CleanupPhase::Daily),
            weekly: raw.weekly.apply(CleanupPhase::Weekly),
            monthly: raw.monthly.apply(CleanupPhase::Monthly),
            insights: raw.insights,
        }
    }
}
