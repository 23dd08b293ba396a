use serde::Serialize;

use super::Cluster;

const LARGE_AVERAGE_SIZE: f64 = 5.0;
const MANY_CLUSTERS: usize = 20;
const OVERSIZED_CLUSTER: usize = 15;

/// Cluster counts by size band: small ≤ 3, medium 4–10, large > 10.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SizeDistribution {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster_count: usize,
    pub total_documents: usize,
    pub average_size: f64,
    pub largest_size: usize,
    pub distribution: SizeDistribution,
    pub insights: Vec<String>,
}

impl ClusterSummary {
    pub fn from_clusters(clusters: &[Cluster]) -> Self {
        if clusters.is_empty() {
            return Self::default();
        }

        let sizes: Vec<usize> = clusters.iter().map(Cluster::len).collect();
        let total: usize = sizes.iter().sum();
        let average = total as f64 / sizes.len() as f64;
        let largest = sizes.iter().copied().max().unwrap_or(0);

        let mut distribution = SizeDistribution::default();
        for &size in &sizes {
            match size {
                0..=3 => distribution.small += 1,
                4..=10 => distribution.medium += 1,
                _ => distribution.large += 1,
            }
        }

        let mut insights = Vec::new();
        if average > LARGE_AVERAGE_SIZE {
            insights.push("large clusters detected, review similarity thresholds".to_string());
        }
        if sizes.len() > MANY_CLUSTERS {
            insights.push("many clusters found, significant optimization opportunity".to_string());
        }
        if largest > OVERSIZED_CLUSTER {
            insights.push("very large cluster detected, similarity may be overly broad".to_string());
        }

        Self {
            cluster_count: sizes.len(),
            total_documents: total,
            average_size: average,
            largest_size: largest,
            distribution,
            insights,
        }
    }
}
