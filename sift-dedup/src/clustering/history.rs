//! Retention of clustering snapshots.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::ClusterSummary;

/// A century; keeps `now - retention` representable.
const MAX_RETENTION_HOURS: u64 = 24 * 365 * 100;

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSnapshot {
    pub id: String,
    pub collection: String,
    pub taken_at: DateTime<Utc>,
    pub document_count: usize,
    pub summary: ClusterSummary,
}

/// Snapshots older than the refresh window are dropped on every record.
#[derive(Debug, Clone)]
pub struct ClusterHistory {
    retention: Duration,
    snapshots: VecDeque<ClusterSnapshot>,
}

impl ClusterHistory {
    pub fn new(refresh_hours: u64) -> Self {
        Self {
            retention: Duration::hours(refresh_hours.min(MAX_RETENTION_HOURS) as i64),
            snapshots: VecDeque::new(),
        }
    }

    /// Store a snapshot and prune expired ones. Returns the snapshot id.
    pub fn record_at(
        &mut self,
        collection: &str,
        document_count: usize,
        summary: ClusterSummary,
        now: DateTime<Utc>,
    ) -> String {
        let id = format!("cluster_{}", uuid::Uuid::new_v4().simple());
        self.snapshots.push_back(ClusterSnapshot {
            id: id.clone(),
            collection: collection.to_string(),
            taken_at: now,
            document_count,
            summary,
        });
        self.prune_at(now);
        id
    }

    pub fn prune_at(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.retention;
        self.snapshots.retain(|s| s.taken_at >= cutoff);
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &ClusterSnapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Clusters of the newest retained snapshot of each collection, summed.
    pub fn active_cluster_count(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        let mut total = 0;
        for snapshot in self.snapshots.iter().rev() {
            if !seen.contains(&snapshot.collection.as_str()) {
                seen.push(&snapshot.collection);
                total += snapshot.summary.cluster_count;
            }
        }
        total
    }
}
