//! Typed configuration for every sift subsystem.
//!
//! # Examples
//!
//! ```
//! use sift_core::config::SiftConfig;
//!
//! let config = SiftConfig::from_toml("[dedup]\nsimilarity_threshold = 0.9").unwrap();
//! assert!((config.dedup.similarity_threshold - 0.9).abs() < f64::EPSILON);
//! assert_eq!(config.cleanup.daily.interval_hours, 24);
//! ```

pub mod cleanup_config;
pub mod clustering_config;
pub mod dedup_config;
pub mod defaults;
pub mod observability_config;
pub mod optimization_config;

pub use cleanup_config::{CleanupConfig, InsightConfig, PhaseConfig};
pub use clustering_config::ClusteringConfig;
pub use dedup_config::DedupConfig;
pub use observability_config::ObservabilityConfig;
pub use optimization_config::OptimizationConfig;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_THRESHOLD, MIN_THRESHOLD};
use crate::errors::ConfigError;
use crate::models::{CleanupPhase, Domain};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub dedup: DedupConfig,
    pub clustering: ClusteringConfig,
    pub optimization: OptimizationConfig,
    pub cleanup: CleanupConfig,
    pub observability: ObservabilityConfig,
}

impl SiftConfig {
    /// Parse from a TOML string. Missing sections and keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })
    }

    /// Check every bound. Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_dedup()?;
        self.validate_clustering()?;
        self.validate_optimization()?;
        for phase in CleanupPhase::ALL {
            self.validate_phase(phase)?;
        }
        self.validate_insights()
    }

    /// Replace every invalid section with its built-in defaults.
    ///
    /// Returns the sanitized config and the violations that forced a fallback.
    pub fn sanitize(mut self) -> (Self, Vec<ConfigError>) {
        let mut errors = Vec::new();

        if let Err(e) = self.validate_dedup() {
            errors.push(e);
            self.dedup = DedupConfig::default();
        }
        if let Err(e) = self.validate_clustering() {
            errors.push(e);
            self.clustering = ClusteringConfig::default();
        }
        if let Err(e) = self.validate_optimization() {
            errors.push(e);
            self.optimization = OptimizationConfig::default();
        }
        for phase in CleanupPhase::ALL {
            if let Err(e) = self.validate_phase(phase) {
                errors.push(e);
                let fallback = PhaseConfig::for_phase(phase);
                match phase {
                    CleanupPhase::Daily => self.cleanup.daily = fallback,
                    CleanupPhase::Weekly => self.cleanup.weekly = fallback,
                    CleanupPhase::Monthly => self.cleanup.monthly = fallback,
                }
            }
        }
        if let Err(e) = self.validate_insights() {
            errors.push(e);
            self.cleanup.insights = InsightConfig::default();
        }

        (self, errors)
    }

    /// Parse and sanitize. Never fails: a parse error yields the full
    /// default config plus the error as a warning.
    pub fn load_or_default(toml_str: &str) -> (Self, Vec<ConfigError>) {
        match Self::from_toml(toml_str) {
            Ok(config) => config.sanitize(),
            Err(e) => (Self::default(), vec![e]),
        }
    }

    fn validate_dedup(&self) -> Result<(), ConfigError> {
        check_threshold("dedup.similarity_threshold", self.dedup.similarity_threshold)?;
        for (name, value) in &self.dedup.domain_thresholds {
            let field = format!("dedup.domain_thresholds.{name}");
            name.parse::<Domain>()
                .map_err(|reason| ConfigError::InvalidValue { field: field.clone(), reason })?;
            check_threshold(&field, *value)?;
        }
        Ok(())
    }

    fn validate_clustering(&self) -> Result<(), ConfigError> {
        let c = &self.clustering;
        check_unit("clustering.cluster_threshold", c.cluster_threshold)?;
        if c.min_cluster_size < 2 {
            return Err(ConfigError::InvalidValue {
                field: "clustering.min_cluster_size".into(),
                reason: format!("must be at least 2, got {}", c.min_cluster_size),
            });
        }
        if c.max_clusters == 0 {
            return Err(ConfigError::InvalidValue {
                field: "clustering.max_clusters".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    fn validate_optimization(&self) -> Result<(), ConfigError> {
        let o = &self.optimization;
        if o.interval_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "optimization.interval_hours".into(),
                reason: "must be positive".into(),
            });
        }
        if !(o.effectiveness_target > 0.0 && o.effectiveness_target <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "optimization.effectiveness_target".into(),
                reason: format!("must be in (0, 1], got {}", o.effectiveness_target),
            });
        }
        if !(o.adjustment_step > 0.0 && o.adjustment_step <= 0.25) {
            return Err(ConfigError::InvalidValue {
                field: "optimization.adjustment_step".into(),
                reason: format!("must be in (0, 0.25], got {}", o.adjustment_step),
            });
        }
        Ok(())
    }

    fn validate_phase(&self, phase: CleanupPhase) -> Result<(), ConfigError> {
        let p = self.cleanup.phase(phase);
        check_threshold(&format!("cleanup.{phase}.similarity_threshold"), p.similarity_threshold)?;
        if p.interval_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: format!("cleanup.{phase}.interval_hours"),
                reason: "must be positive".into(),
            });
        }
        if p.max_processing_time_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: format!("cleanup.{phase}.max_processing_time_seconds"),
                reason: "must be positive".into(),
            });
        }
        if p.enabled && p.collections.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("cleanup.{phase}.collections"),
                reason: "an enabled phase needs at least one collection".into(),
            });
        }
        Ok(())
    }

    fn validate_insights(&self) -> Result<(), ConfigError> {
        let i = &self.cleanup.insights;
        if i.imbalance_ratio <= 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "cleanup.insights.imbalance_ratio".into(),
                reason: format!("must exceed 1.0, got {}", i.imbalance_ratio),
            });
        }
        Ok(())
    }
}

fn check_threshold(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value) {
        return Err(ConfigError::ThresholdOutOfBounds {
            field: field.to_string(),
            value,
            min: MIN_THRESHOLD,
            max: MAX_THRESHOLD,
        });
    }
    Ok(())
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ThresholdOutOfBounds {
            field: field.to_string(),
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}
