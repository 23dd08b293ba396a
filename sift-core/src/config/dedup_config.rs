use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::Domain;

/// Deduplication and threshold-policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Master switch for deduplication passes.
    pub enabled: bool,
    /// Base similarity threshold used when no domain threshold applies.
    pub similarity_threshold: f64,
    /// Classify documents and apply per-domain thresholds.
    pub enable_domain_aware_thresholds: bool,
    /// Per-domain starting thresholds, keyed by domain name.
    pub domain_thresholds: BTreeMap<String, f64>,
}

impl DedupConfig {
    /// The built-in domain threshold map.
    pub fn default_domain_thresholds() -> BTreeMap<String, f64> {
        [
            (Domain::Code, defaults::DEFAULT_CODE_THRESHOLD),
            (Domain::Text, defaults::DEFAULT_TEXT_THRESHOLD),
            (Domain::Data, defaults::DEFAULT_DATA_THRESHOLD),
            (Domain::Documentation, defaults::DEFAULT_DOCUMENTATION_THRESHOLD),
        ]
        .into_iter()
        .map(|(domain, value)| (domain.to_string(), value))
        .collect()
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_DEDUP_ENABLED,
            similarity_threshold: defaults::DEFAULT_BASE_THRESHOLD,
            enable_domain_aware_thresholds: defaults::DEFAULT_DOMAIN_AWARE_THRESHOLDS,
            domain_thresholds: Self::default_domain_thresholds(),
        }
    }
}
