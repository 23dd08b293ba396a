use serde::{Deserialize, Serialize};

use super::defaults;

/// Automatic threshold optimization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    /// Enable the threshold optimizer.
    pub enabled: bool,
    /// Hours between optimizer runs.
    pub interval_hours: u64,
    /// Window of effectiveness records consulted by a run.
    pub performance_window_hours: u64,
    /// Effectiveness the optimizer steers towards (0.0–1.0).
    pub effectiveness_target: f64,
    /// Threshold step applied per run; fine-tuning uses half of it.
    pub adjustment_step: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_OPTIMIZATION_ENABLED,
            interval_hours: defaults::DEFAULT_OPTIMIZATION_INTERVAL_HOURS,
            performance_window_hours: defaults::DEFAULT_PERFORMANCE_WINDOW_HOURS,
            effectiveness_target: defaults::DEFAULT_EFFECTIVENESS_TARGET,
            adjustment_step: defaults::DEFAULT_ADJUSTMENT_STEP,
        }
    }
}
