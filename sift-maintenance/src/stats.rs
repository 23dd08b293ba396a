use serde::{Deserialize, Serialize};
use sift_tuning::CumulativeStats;

use crate::report::CollectionReport;

/// Lifetime dedup counters across every completed collection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    pub passes: u64,
    pub documents_processed: u64,
    pub duplicates_found: u64,
    pub documents_removed: u64,
}

impl DedupStats {
    pub fn record(&mut self, pass: &CollectionReport) {
        self.passes += 1;
        self.documents_processed += pass.documents_processed as u64;
        self.duplicates_found += pass.duplicates_found as u64;
        self.documents_removed += pass.documents_removed as u64;
    }

    /// Removed / processed as a percentage; `None` before any document
    /// was processed.
    pub fn effectiveness_percent(&self) -> Option<f64> {
        (self.documents_processed > 0)
            .then(|| self.documents_removed as f64 / self.documents_processed as f64 * 100.0)
    }

    pub fn cumulative(&self) -> CumulativeStats {
        CumulativeStats {
            duplicates_found: self.duplicates_found,
            documents_removed: self.documents_removed,
        }
    }
}
