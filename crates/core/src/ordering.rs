//! Recency ordering applied to every snapshot.
//!
//! Most recent first. A record whose `created_at` has not resolved yet
//! sorts ahead of everything else. The sort is stable, so records with
//! equal timestamps keep the order the store reported them in.

use std::cmp::Ordering;

use crate::project::Project;
use crate::types::Timestamp;

/// Sort `projects` in place by `created_at` descending.
pub fn sort_by_recency(projects: &mut [Project]) {
    // `sort_by` is a stable merge sort.
    projects.sort_by(|a, b| compare_recency(a.created_at.as_ref(), b.created_at.as_ref()));
}

fn compare_recency(a: Option<&Timestamp>, b: Option<&Timestamp>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(a),
    }
}
