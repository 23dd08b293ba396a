//! Arena + index clustering.
//!
//! Document ids are interned to dense indices for the duration of one
//! build. Clusters live in arena slots; `membership[doc]` names the slot a
//! document belongs to. Merging absorbs the smaller cluster into the larger
//! and frees the absorbed slot.

use std::collections::HashMap;

use serde::Serialize;
use sift_core::config::ClusteringConfig;
use sift_core::models::{DocumentId, SimilarityPair};

use super::summary::ClusterSummary;

/// A set of near-duplicate documents, in the order they joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub members: Vec<DocumentId>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusteringReport {
    pub clusters: Vec<Cluster>,
    pub summary: ClusterSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClusterOutcome {
    /// Clustering is switched off in configuration.
    Disabled,
    /// No similarity pairs to cluster.
    NoData,
    Clustered(ClusteringReport),
}

impl ClusterOutcome {
    /// Clusters found, empty for `Disabled` and `NoData`.
    pub fn clusters(&self) -> &[Cluster] {
        match self {
            Self::Clustered(report) => &report.clusters,
            Self::Disabled | Self::NoData => &[],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClusterBuilder {
    min_size: usize,
    max_clusters: usize,
}

impl ClusterBuilder {
    pub fn new(min_size: usize, max_clusters: usize) -> Self {
        Self {
            min_size: min_size.max(2),
            max_clusters,
        }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(config.min_cluster_size, config.max_clusters)
    }

    /// Group pairs into maximal clusters, processing pairs in input order.
    pub fn build(&self, pairs: &[SimilarityPair]) -> ClusterOutcome {
        if pairs.iter().all(SimilarityPair::is_self_pair) {
            return ClusterOutcome::NoData;
        }

        let mut arena = Arena::default();
        for pair in pairs.iter().filter(|p| !p.is_self_pair()) {
            let a = arena.intern(&pair.a);
            let b = arena.intern(&pair.b);
            arena.link(a, b);
        }

        let mut clusters: Vec<Cluster> = arena
            .into_clusters()
            .into_iter()
            .filter(|c| c.len() >= self.min_size)
            .collect();

        if clusters.len() > self.max_clusters {
            // Stable: equal-sized clusters keep creation order.
            clusters.sort_by_key(|c| std::cmp::Reverse(c.len()));
            clusters.truncate(self.max_clusters);
        }

        let summary = ClusterSummary::from_clusters(&clusters);
        ClusterOutcome::Clustered(ClusteringReport { clusters, summary })
    }
}

#[derive(Default)]
struct Arena {
    ids: Vec<DocumentId>,
    index: HashMap<DocumentId, usize>,
    membership: Vec<Option<usize>>,
    slots: Vec<Option<Vec<usize>>>,
}

impl Arena {
    fn intern(&mut self, id: &DocumentId) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id.clone());
        self.index.insert(id.clone(), idx);
        self.membership.push(None);
        idx
    }

    fn link(&mut self, a: usize, b: usize) {
        match (self.membership[a], self.membership[b]) {
            (None, None) => {
                let slot = self.slots.len();
                self.slots.push(Some(vec![a, b]));
                self.membership[a] = Some(slot);
                self.membership[b] = Some(slot);
            }
            (Some(slot), None) => self.append(slot, b),
            (None, Some(slot)) => self.append(slot, a),
            (Some(sa), Some(sb)) if sa != sb => {
                let (keep, absorbed) = if self.slot_len(sa) >= self.slot_len(sb) {
                    (sa, sb)
                } else {
                    (sb, sa)
                };
                self.absorb(keep, absorbed);
            }
            (Some(_), Some(_)) => {}
        }
    }

    fn slot_len(&self, slot: usize) -> usize {
        self.slots[slot].as_ref().map_or(0, Vec::len)
    }

    fn append(&mut self, slot: usize, doc: usize) {
        if let Some(members) = self.slots[slot].as_mut() {
            members.push(doc);
            self.membership[doc] = Some(slot);
        }
    }

    fn absorb(&mut self, keep: usize, absorbed: usize) {
        let Some(moved) = self.slots[absorbed].take() else {
            return;
        };
        for &doc in &moved {
            self.membership[doc] = Some(keep);
        }
        if let Some(members) = self.slots[keep].as_mut() {
            members.extend(moved);
        }
    }

    /// Live clusters in slot-creation order.
    fn into_clusters(self) -> Vec<Cluster> {
        let ids = self.ids;
        self.slots
            .into_iter()
            .flatten()
            .map(|members| Cluster {
                members: members.into_iter().map(|i| ids[i].clone()).collect(),
            })
            .collect()
    }
}
