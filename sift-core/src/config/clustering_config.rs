use serde::{Deserialize, Serialize};

use super::defaults;

/// Semantic clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Enable clustering analysis and cluster-based duplicate grouping.
    pub enabled: bool,
    /// Similarity threshold for cluster membership during analysis passes.
    pub cluster_threshold: f64,
    /// Clusters smaller than this are dropped.
    pub min_cluster_size: usize,
    /// Keep at most this many clusters (largest first).
    pub max_clusters: usize,
    /// Clustering snapshots older than this are discarded.
    pub cluster_refresh_hours: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_CLUSTERING_ENABLED,
            cluster_threshold: defaults::DEFAULT_CLUSTER_THRESHOLD,
            min_cluster_size: defaults::DEFAULT_MIN_CLUSTER_SIZE,
            max_clusters: defaults::DEFAULT_MAX_CLUSTERS,
            cluster_refresh_hours: defaults::DEFAULT_CLUSTER_REFRESH_HOURS,
        }
    }
}
