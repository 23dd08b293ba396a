//! Which document of a duplicate group survives.

use std::cmp::Ordering;

use sift_core::models::Document;

/// Higher importance wins, then higher access count, then the newer
/// timestamp (a missing timestamp is oldest). Full ties keep the earlier
/// document.
pub fn compare_keepers(a: &Document, b: &Document) -> Ordering {
    a.importance_score()
        .total_cmp(&b.importance_score())
        .then_with(|| a.access_count().cmp(&b.access_count()))
        .then_with(|| a.timestamp().cmp(&b.timestamp()))
}

/// Index of the keeper within `group`, or `None` for an empty group.
pub fn select_keeper(group: &[&Document]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, doc) in group.iter().enumerate() {
        match best {
            Some(b) if compare_keepers(doc, group[b]) != Ordering::Greater => {}
            _ => best = Some(i),
        }
    }
    best
}
