//! Aggregate analytics over the whole task set.
//!
//! Served through the "analytics" cache category: the longest TTL in the
//! system, because these answers are expensive to recompute and tolerant
//! of staleness. Task mutations invalidate the category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trestle_cache::{fingerprint, Category};
use trestle_core::errors::TrestleResult;
use trestle_script::builder;

use crate::engine::{QueryEngine, ResponseMeta};

/// Remaining-work entry for one project inside [`WorkloadStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLoad {
    pub name: String,
    /// Open tasks still in the project.
    pub remaining: u64,
}

/// Workload aggregate across every task in the store.
///
/// Counts are disjoint where the runtime computes them so: a completed
/// task contributes to `completed` only. Open tasks can appear in several
/// of the remaining buckets at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStats {
    pub total_tasks: u64,
    pub completed: u64,
    pub overdue: u64,
    pub due_today: u64,
    pub flagged: u64,
    pub available: u64,
    /// Open-task counts keyed by project id.
    pub by_project: BTreeMap<String, ProjectLoad>,
}

impl QueryEngine {
    /// One bulk aggregate pass over the task set.
    pub fn workload_stats(&self) -> TrestleResult<(WorkloadStats, ResponseMeta)> {
        let key = fingerprint(&"workload_stats")?;
        self.cached_read(Category::Analytics, key, || {
            self.run_request(&builder::workload_stats())
        })
    }
}
