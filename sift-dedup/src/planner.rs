//! Dedup planning for one collection snapshot.
//!
//! thresholds → provider query at the lowest threshold → per-pair
//! acceptance at the lower of the two documents' thresholds →
//! clustering → one merge decision per cluster. A pair spanning two
//! domains merges once it clears the looser domain's threshold.

use std::collections::HashMap;

use serde::Serialize;
use sift_core::errors::{DedupError, StoreError};
use sift_core::models::{Document, DocumentId, SimilarityPair};
use sift_core::traits::ISimilarityProvider;
use tracing::{debug, warn};

use crate::clustering::{ClusterBuilder, ClusterOutcome};
use crate::keeper::select_keeper;
use crate::threshold_policy::ThresholdPolicy;

/// Keep one document of a duplicate group, remove the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeDecision {
    pub keeper: DocumentId,
    pub duplicates: Vec<DocumentId>,
    /// Highest accepted score inside the group.
    pub max_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupPlan {
    pub documents_scanned: usize,
    /// Lowest per-document threshold; the provider was queried at this value.
    pub query_threshold: f64,
    pub pairs_considered: usize,
    pub pairs_accepted: usize,
    pub decisions: Vec<MergeDecision>,
}

impl DedupPlan {
    pub fn duplicates_found(&self) -> usize {
        self.decisions.iter().map(|d| d.duplicates.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DedupOutcome {
    Disabled,
    /// Fewer than two documents, or no pair passed its thresholds.
    NoData { documents_scanned: usize },
    Planned(DedupPlan),
}

impl DedupOutcome {
    pub fn documents_scanned(&self) -> usize {
        match self {
            Self::Disabled => 0,
            Self::NoData { documents_scanned } => *documents_scanned,
            Self::Planned(plan) => plan.documents_scanned,
        }
    }

    pub fn decisions(&self) -> &[MergeDecision] {
        match self {
            Self::Planned(plan) => &plan.decisions,
            Self::Disabled | Self::NoData { .. } => &[],
        }
    }
}

/// Plans merges; never deletes.
#[derive(Debug, Clone)]
pub struct DedupPlanner {
    policy: ThresholdPolicy,
    enabled: bool,
}

impl DedupPlanner {
    pub fn new(policy: ThresholdPolicy, enabled: bool) -> Self {
        Self { policy, enabled }
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn plan(
        &self,
        documents: &[Document],
        provider: &dyn ISimilarityProvider,
        base_threshold: f64,
    ) -> Result<DedupOutcome, StoreError> {
        if !self.enabled {
            return Ok(DedupOutcome::Disabled);
        }
        let scanned = documents.len();
        if scanned < 2 {
            return Ok(DedupOutcome::NoData {
                documents_scanned: scanned,
            });
        }

        let decisions = self.policy.apply(documents, base_threshold);
        let mut by_id: HashMap<&DocumentId, (usize, f64)> = HashMap::with_capacity(scanned);
        for (i, (doc, decision)) in documents.iter().zip(&decisions).enumerate() {
            by_id.entry(&doc.id).or_insert((i, decision.threshold));
        }
        let query_threshold = decisions
            .iter()
            .map(|d| d.threshold)
            .fold(f64::INFINITY, f64::min);

        let pairs = provider.find_similar_pairs(documents, query_threshold)?;
        let pairs_considered = pairs.len();

        let mut accepted = Vec::new();
        for pair in pairs {
            if pair.is_self_pair() {
                continue;
            }
            let (ta, tb) = match check_pair(&pair, &by_id) {
                Ok(t) => t,
                Err(e) => {
                    warn!(error = %e, "dropping similarity pair");
                    continue;
                }
            };
            if pair.score >= ta.min(tb) {
                accepted.push(pair);
            }
        }
        debug!(
            scanned,
            query_threshold,
            pairs_considered,
            accepted = accepted.len(),
            "similarity pairs filtered"
        );

        let clusters = match ClusterBuilder::new(2, usize::MAX).build(&accepted) {
            ClusterOutcome::Clustered(report) => report.clusters,
            ClusterOutcome::NoData | ClusterOutcome::Disabled => {
                return Ok(DedupOutcome::NoData {
                    documents_scanned: scanned,
                })
            }
        };

        let mut max_scores: HashMap<&DocumentId, f64> = HashMap::new();
        for pair in &accepted {
            for id in [&pair.a, &pair.b] {
                let entry = max_scores.entry(id).or_insert(0.0);
                *entry = entry.max(pair.score);
            }
        }

        let mut merge_decisions = Vec::with_capacity(clusters.len());
        for cluster in &clusters {
            let group: Vec<&Document> = cluster
                .members
                .iter()
                .filter_map(|id| by_id.get(id).map(|&(i, _)| &documents[i]))
                .collect();
            let Some(keeper_idx) = select_keeper(&group) else {
                continue;
            };
            let keeper = group[keeper_idx].id.clone();
            let duplicates: Vec<DocumentId> = group
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != keeper_idx)
                .map(|(_, d)| d.id.clone())
                .collect();
            let max_score = cluster
                .members
                .iter()
                .filter_map(|id| max_scores.get(id).copied())
                .fold(0.0, f64::max);
            merge_decisions.push(MergeDecision {
                keeper,
                duplicates,
                max_score,
            });
        }

        Ok(DedupOutcome::Planned(DedupPlan {
            documents_scanned: scanned,
            query_threshold,
            pairs_considered,
            pairs_accepted: accepted.len(),
            decisions: merge_decisions,
        }))
    }
}

/// Thresholds of both documents, or why the pair can't be trusted.
fn check_pair(
    pair: &SimilarityPair,
    by_id: &HashMap<&DocumentId, (usize, f64)>,
) -> Result<(f64, f64), DedupError> {
    if !(0.0..=1.0).contains(&pair.score) {
        return Err(DedupError::InvalidScore {
            a: pair.a.to_string(),
            b: pair.b.to_string(),
            score: pair.score,
        });
    }
    let lookup = |id: &DocumentId| {
        by_id
            .get(id)
            .map(|&(_, t)| t)
            .ok_or_else(|| DedupError::UnknownDocument { id: id.to_string() })
    };
    Ok((lookup(&pair.a)?, lookup(&pair.b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::models::ThresholdConfig;

    struct FixedPairs(Vec<SimilarityPair>);

    impl ISimilarityProvider for FixedPairs {
        fn find_similar_pairs(&self, _: &[Document], threshold: f64) -> Result<Vec<SimilarityPair>, StoreError> {
            Ok(self.0.iter().filter(|p| p.score >= threshold).cloned().collect())
        }
    }

    fn planner() -> DedupPlanner {
        DedupPlanner::new(ThresholdPolicy::new(ThresholdConfig::default(), false), true)
    }

    fn docs(ids: &[&str]) -> Vec<Document> {
        ids.iter().map(|id| Document::new(*id, "body")).collect()
    }

    #[test]
    fn disabled_planner_short_circuits() {
        let planner = DedupPlanner::new(ThresholdPolicy::new(ThresholdConfig::default(), false), false);
        let outcome = planner.plan(&docs(&["a", "b"]), &FixedPairs(vec![]), 0.9).unwrap();
        assert!(matches!(outcome, DedupOutcome::Disabled));
    }

    #[test]
    fn single_document_is_no_data() {
        let outcome = planner().plan(&docs(&["a"]), &FixedPairs(vec![]), 0.9).unwrap();
        assert!(matches!(outcome, DedupOutcome::NoData { documents_scanned: 1 }));
    }

    #[test]
    fn group_keeps_one_and_removes_the_rest() {
        let mut documents = docs(&["a", "b", "c"]);
        documents[2] = Document::new("c", "body").with_metadata("importance_score", 0.9);
        let provider = FixedPairs(vec![
            SimilarityPair::new("a", "b", 0.97),
            SimilarityPair::new("b", "c", 0.96),
        ]);
        let outcome = planner().plan(&documents, &provider, 0.95).unwrap();
        let DedupOutcome::Planned(plan) = outcome else {
            panic!("expected a plan");
        };
        assert_eq!(plan.decisions.len(), 1);
        assert_eq!(plan.decisions[0].keeper, DocumentId::from("c"));
        assert_eq!(plan.decisions[0].duplicates, vec![DocumentId::from("a"), DocumentId::from("b")]);
        assert_eq!(plan.decisions[0].max_score, 0.97);
        assert_eq!(plan.duplicates_found(), 2);
    }

    #[test]
    fn pair_passes_at_the_lower_threshold_of_the_two() {
        let policy = ThresholdPolicy::new(ThresholdConfig::default(), true);
        let planner = DedupPlanner::new(policy, true);
        let body: String = "plain prose words ".chars().cycle().take(500).collect();
        let documents = vec![
            // code: 0.85
            Document::new("code1", body.clone()).with_metadata("domain", "code"),
            // text: 0.95
            Document::new("text1", body.clone()),
            Document::new("text2", body.clone()),
        ];
        let provider = FixedPairs(vec![
            SimilarityPair::new("code1", "text1", 0.90),
            SimilarityPair::new("code1", "text2", 0.84),
        ]);
        let outcome = planner.plan(&documents, &provider, 0.95).unwrap();
        let DedupOutcome::Planned(plan) = outcome else {
            panic!("expected a plan");
        };
        assert_eq!(plan.query_threshold, 0.85);
        assert_eq!(plan.pairs_considered, 2);
        // code1/text1 clears code's 0.85; code1/text2 clears neither.
        assert_eq!(plan.pairs_accepted, 1);
        assert_eq!(plan.decisions.len(), 1);
        assert_eq!(plan.decisions[0].duplicates.len(), 1);
        assert!(plan.decisions[0].duplicates[0].as_str() != "text2");
    }

    #[test]
    fn unknown_ids_and_bad_scores_are_dropped() {
        let provider = FixedPairs(vec![
            SimilarityPair::new("a", "ghost", 0.99),
            SimilarityPair::new("a", "b", 1.5),
        ]);
        let outcome = planner().plan(&docs(&["a", "b"]), &provider, 0.9).unwrap();
        assert!(matches!(outcome, DedupOutcome::NoData { documents_scanned: 2 }));
    }

    #[test]
    fn provider_errors_propagate() {
        struct Broken;
        impl ISimilarityProvider for Broken {
            fn find_similar_pairs(&self, _: &[Document], _: f64) -> Result<Vec<SimilarityPair>, StoreError> {
                Err(StoreError::SimilarityFailed { reason: "down".into() })
            }
        }
        assert!(planner().plan(&docs(&["a", "b"]), &Broken, 0.9).is_err());
    }
}
