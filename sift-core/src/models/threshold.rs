use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Domain;
use crate::config::DedupConfig;
use crate::constants::{MAX_THRESHOLD, MIN_THRESHOLD};
use crate::errors::ConfigError;

/// The mutable threshold set shared by the policy (reader) and the
/// optimizer (sole writer).
///
/// Every stored value stays within `[min_threshold, max_threshold]`; the
/// setters clamp rather than reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    base_threshold: f64,
    domain_thresholds: BTreeMap<Domain, f64>,
    min_threshold: f64,
    max_threshold: f64,
}

impl ThresholdConfig {
    /// Build from dedup config, rejecting unknown domains and
    /// out-of-range values.
    pub fn from_config(config: &DedupConfig) -> Result<Self, ConfigError> {
        let domain_thresholds = parse_domain_map(&config.domain_thresholds)?;
        let this = Self {
            base_threshold: config.similarity_threshold,
            domain_thresholds,
            min_threshold: MIN_THRESHOLD,
            max_threshold: MAX_THRESHOLD,
        };
        this.validate()?;
        Ok(this)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = |field: String, value: f64| {
            if (self.min_threshold..=self.max_threshold).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::ThresholdOutOfBounds {
                    field,
                    value,
                    min: self.min_threshold,
                    max: self.max_threshold,
                })
            }
        };
        check("base_threshold".into(), self.base_threshold)?;
        for (domain, value) in &self.domain_thresholds {
            check(format!("domain_thresholds.{domain}"), *value)?;
        }
        Ok(())
    }

    pub fn base_threshold(&self) -> f64 {
        self.base_threshold
    }

    pub fn domain_thresholds(&self) -> &BTreeMap<Domain, f64> {
        &self.domain_thresholds
    }

    pub fn domain_threshold(&self, domain: Domain) -> Option<f64> {
        self.domain_thresholds.get(&domain).copied()
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    pub fn max_threshold(&self) -> f64 {
        self.max_threshold
    }

    /// Clamp a candidate value into the allowed range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min_threshold, self.max_threshold)
    }

    /// Set the base threshold (clamped). Returns the stored value.
    pub fn set_base_threshold(&mut self, value: f64) -> f64 {
        self.base_threshold = self.clamp(value);
        self.base_threshold
    }

    /// Set a domain threshold (clamped). Returns the stored value.
    pub fn set_domain_threshold(&mut self, domain: Domain, value: f64) -> f64 {
        let clamped = self.clamp(value);
        self.domain_thresholds.insert(domain, clamped);
        clamped
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        let domain_thresholds = Domain::ALL
            .into_iter()
            .filter_map(|domain| {
                DedupConfig::default_domain_thresholds()
                    .get(domain.as_str())
                    .map(|value| (domain, *value))
            })
            .collect();
        Self {
            base_threshold: crate::config::defaults::DEFAULT_BASE_THRESHOLD,
            domain_thresholds,
            min_threshold: MIN_THRESHOLD,
            max_threshold: MAX_THRESHOLD,
        }
    }
}

fn parse_domain_map(raw: &BTreeMap<String, f64>) -> Result<BTreeMap<Domain, f64>, ConfigError> {
    raw.iter()
        .map(|(name, value)| {
            name.parse::<Domain>()
                .map(|domain| (domain, *value))
                .map_err(|reason| ConfigError::InvalidValue {
                    field: format!("domain_thresholds.{name}"),
                    reason,
                })
        })
        .collect()
}
