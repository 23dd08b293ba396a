//! Per-document similarity thresholds from domain and content signals.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use sift_core::models::{Document, Domain, ThresholdConfig};

use crate::classifier::classify;

/// Batches at or above this size are classified in parallel.
const PARALLEL_MIN_BATCH: usize = 256;

const LONG_CONTENT_CHARS: usize = 2000;
const SHORT_CONTENT_CHARS: usize = 200;
const LONG_CONTENT_ADJUSTMENT: f64 = -0.02;
const SHORT_CONTENT_ADJUSTMENT: f64 = 0.02;

const HIGH_IMPORTANCE: f64 = 0.8;
const LOW_IMPORTANCE: f64 = 0.3;
const HIGH_IMPORTANCE_ADJUSTMENT: f64 = 0.03;
const LOW_IMPORTANCE_ADJUSTMENT: f64 = -0.02;

const HIGH_ACCESS_COUNT: u64 = 10;
const HIGH_ACCESS_ADJUSTMENT: f64 = 0.02;

/// The threshold chosen for one document and the tags that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdDecision {
    pub threshold: f64,
    pub reason: String,
}

/// Domain distribution of a batch and the threshold each domain receives.
#[derive(Debug, Clone, Serialize)]
pub struct DomainAnalysis {
    pub total_documents: usize,
    pub domain_aware: bool,
    pub distribution: BTreeMap<Domain, usize>,
    /// Starting threshold per domain present, before content adjustments.
    pub thresholds: BTreeMap<Domain, f64>,
}

/// Reads a `ThresholdConfig` snapshot; never mutates it.
#[derive(Debug, Clone)]
pub struct ThresholdPolicy {
    thresholds: ThresholdConfig,
    domain_aware: bool,
}

impl ThresholdPolicy {
    pub fn new(thresholds: ThresholdConfig, domain_aware: bool) -> Self {
        Self {
            thresholds,
            domain_aware,
        }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn is_domain_aware(&self) -> bool {
        self.domain_aware
    }

    /// One decision per document, in input order.
    pub fn apply(&self, documents: &[Document], base_threshold: f64) -> Vec<ThresholdDecision> {
        if !self.domain_aware {
            return documents
                .iter()
                .map(|_| ThresholdDecision {
                    threshold: base_threshold,
                    reason: "base_threshold".to_string(),
                })
                .collect();
        }

        if documents.len() >= PARALLEL_MIN_BATCH {
            documents
                .par_iter()
                .map(|doc| self.decide(doc, base_threshold))
                .collect()
        } else {
            documents
                .iter()
                .map(|doc| self.decide(doc, base_threshold))
                .collect()
        }
    }

    /// Domain-aware decision for a single document.
    pub fn decide(&self, document: &Document, base_threshold: f64) -> ThresholdDecision {
        let domain = classify(document);
        let (start, mut reason) = match self.thresholds.domain_threshold(domain) {
            Some(t) => (t, format!("domain_{domain}")),
            None => (base_threshold, "base_threshold".to_string()),
        };

        let (adjustment, tags) = content_adjustment(document);
        let threshold = self.thresholds.clamp(start + adjustment);

        reason.push_str("_adjusted_");
        if tags.is_empty() {
            reason.push_str("no_adjustment");
        } else {
            reason.push_str(&tags.join("_"));
        }

        ThresholdDecision { threshold, reason }
    }

    pub fn analyze_domains(&self, documents: &[Document], base_threshold: f64) -> DomainAnalysis {
        let domains: Vec<Domain> = if documents.len() >= PARALLEL_MIN_BATCH {
            documents.par_iter().map(classify).collect()
        } else {
            documents.iter().map(classify).collect()
        };

        let mut distribution = BTreeMap::new();
        for domain in domains {
            *distribution.entry(domain).or_insert(0) += 1;
        }

        let thresholds = distribution
            .keys()
            .map(|&domain| {
                let t = if self.domain_aware {
                    self.thresholds.domain_threshold(domain).unwrap_or(base_threshold)
                } else {
                    base_threshold
                };
                (domain, t)
            })
            .collect();

        DomainAnalysis {
            total_documents: documents.len(),
            domain_aware: self.domain_aware,
            distribution,
            thresholds,
        }
    }
}

/// Summed content adjustment and its tags, in a fixed order.
fn content_adjustment(document: &Document) -> (f64, Vec<&'static str>) {
    let mut adjustment = 0.0;
    let mut tags = Vec::new();

    let len = document.char_len();
    if len > LONG_CONTENT_CHARS {
        adjustment += LONG_CONTENT_ADJUSTMENT;
        tags.push("long_content");
    } else if len < SHORT_CONTENT_CHARS {
        adjustment += SHORT_CONTENT_ADJUSTMENT;
        tags.push("short_content");
    }

    let importance = document.importance_score();
    if importance > HIGH_IMPORTANCE {
        adjustment += HIGH_IMPORTANCE_ADJUSTMENT;
        tags.push("high_importance");
    } else if importance < LOW_IMPORTANCE {
        adjustment += LOW_IMPORTANCE_ADJUSTMENT;
        tags.push("low_importance");
    }

    if document.access_count() > HIGH_ACCESS_COUNT {
        adjustment += HIGH_ACCESS_ADJUSTMENT;
        tags.push("high_access");
    }

    (adjustment, tags)
}
