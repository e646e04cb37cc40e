//! Bulk tier: one aggregate script evaluating the predicate in-process.

use trestle_core::errors::TrestleResult;
use trestle_core::filter::TaskFilter;
use trestle_core::records::Task;
use trestle_script::builder;

use crate::engine::QueryEngine;

pub(crate) struct BulkOutcome {
    pub tasks: Vec<Task>,
    /// Runtime-reported execution time for the single call.
    pub query_time_ms: Option<u64>,
}

/// One dispatch; the runtime applies the filter itself and truncates at
/// `limit` in its own iteration order, before any host-side sort.
pub(crate) fn run(
    engine: &QueryEngine,
    filter: &TaskFilter,
    limit: usize,
) -> TrestleResult<BulkOutcome> {
    let (value, meta) = engine.run_request(&builder::list_tasks(filter, limit))?;
    let tasks: Vec<Task> = serde_json::from_value(value)?;
    Ok(BulkOutcome {
        tasks,
        query_time_ms: meta.query_time_ms,
    })
}
