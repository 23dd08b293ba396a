//! Deterministic `ISimilarityProvider` implementations.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use sift_core::errors::StoreError;
use sift_core::models::{Document, SimilarityPair};
use sift_core::traits::ISimilarityProvider;

/// Returns a fixed pair list, filtered to the documents and threshold of
/// each call. Records the thresholds it was queried with.
#[derive(Default)]
pub struct ScriptedSimilarity {
    pairs: Vec<SimilarityPair>,
    fail: AtomicBool,
    calls: AtomicUsize,
    thresholds: Mutex<Vec<f64>>,
}

impl ScriptedSimilarity {
    pub fn new(pairs: Vec<SimilarityPair>) -> Self {
        Self {
            pairs,
            ..Self::default()
        }
    }

    /// Convenience: `(a, b, score)` triples.
    pub fn from_triples(triples: &[(&str, &str, f64)]) -> Self {
        Self::new(
            triples
                .iter()
                .map(|(a, b, s)| SimilarityPair::new(*a, *b, *s))
                .collect(),
        )
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queried_thresholds(&self) -> Vec<f64> {
        self.thresholds.lock().unwrap().clone()
    }
}

impl ISimilarityProvider for ScriptedSimilarity {
    fn find_similar_pairs(
        &self,
        documents: &[Document],
        threshold: f64,
    ) -> Result<Vec<SimilarityPair>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.thresholds.lock().unwrap().push(threshold);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::SimilarityFailed {
                reason: "index rebuilding".into(),
            });
        }
        let present: BTreeSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        Ok(self
            .pairs
            .iter()
            .filter(|p| p.score >= threshold)
            .filter(|p| present.contains(p.a.as_str()) && present.contains(p.b.as_str()))
            .cloned()
            .collect())
    }
}

/// Token-set Jaccard similarity over whitespace-separated lowercase words.
#[derive(Debug, Default, Clone, Copy)]
pub struct JaccardSimilarity;

impl JaccardSimilarity {
    pub fn score(a: &str, b: &str) -> f64 {
        let ta: BTreeSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
        let tb: BTreeSet<String> = b.split_whitespace().map(str::to_lowercase).collect();
        if ta.is_empty() && tb.is_empty() {
            return 1.0;
        }
        let inter = ta.intersection(&tb).count() as f64;
        let union = ta.union(&tb).count() as f64;
        inter / union
    }
}

impl ISimilarityProvider for JaccardSimilarity {
    fn find_similar_pairs(
        &self,
        documents: &[Document],
        threshold: f64,
    ) -> Result<Vec<SimilarityPair>, StoreError> {
        let mut pairs = Vec::new();
        for (i, a) in documents.iter().enumerate() {
            for b in &documents[i + 1..] {
                let score = Self::score(&a.content, &b.content);
                if score >= threshold {
                    pairs.push(SimilarityPair::new(a.id.clone(), b.id.clone(), score));
                }
            }
        }
        Ok(pairs)
    }
}
