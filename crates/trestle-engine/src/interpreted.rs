//! Interpreted tier: per-record probing under the iteration cap.
//!
//! One dispatch enumerates candidate ids, then every candidate in the
//! scanned prefix costs a further dispatch. The cap bounds that cost; when
//! it truncates the scan, the in-prefix match ratio is extrapolated to the
//! full candidate set and the result is flagged as an estimate.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trestle_core::errors::{ErrorCode, TrestleResult};
use trestle_core::filter::TaskFilter;
use trestle_core::records::Task;
use trestle_query::matches;
use trestle_script::builder;

use crate::engine::QueryEngine;

/// Scan accounting for an interpreted-tier query.
///
/// Extrapolation assumes uniform match density across the candidate set;
/// when `limited` is true, `estimated_total` is an estimate, not a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    /// Matches observed within the scanned prefix.
    pub matched_in_scan: usize,
    /// Candidates probed, including failed probes.
    pub scanned: usize,
    /// Probes skipped after a per-record failure.
    pub skipped: usize,
    /// Size of the full candidate set.
    pub candidate_total: usize,
    /// Exact match count when the whole set was scanned, otherwise the
    /// prefix ratio projected onto `candidate_total`.
    pub estimated_total: usize,
    /// True when the cap truncated the scan.
    pub limited: bool,
}

pub(crate) struct InterpretedOutcome {
    pub tasks: Vec<Task>,
    pub counts: MatchCounts,
}

/// Enumerate candidates, probe the capped prefix, evaluate host-side.
///
/// A per-record failure (record gone, unparseable snapshot, in-script
/// error) skips that record; a failure that means the target itself is
/// unreachable aborts the scan.
pub(crate) fn run(engine: &QueryEngine, filter: &TaskFilter) -> TrestleResult<InterpretedOutcome> {
    let (ids_value, _) = engine.run_request(&builder::enumerate_task_ids())?;
    let ids: Vec<String> = serde_json::from_value(ids_value)?;

    let cap = engine.iteration_cap();
    let candidate_total = ids.len();
    let scan_len = candidate_total.min(cap);
    let limited = candidate_total > cap;

    let mut tasks = Vec::new();
    let mut skipped = 0usize;
    for id in &ids[..scan_len] {
        let value = match engine.run_request(&builder::probe_task(id)) {
            Ok((value, _)) => value,
            Err(err) if fatal(err.code()) => return Err(err),
            Err(err) => {
                debug!(id = %id, code = %err.code(), "skipping failed probe");
                skipped += 1;
                continue;
            }
        };
        match serde_json::from_value::<Task>(value) {
            Ok(task) => {
                if matches(&task, filter) {
                    tasks.push(task);
                }
            }
            Err(err) => {
                debug!(id = %id, error = %err, "skipping unparseable snapshot");
                skipped += 1;
            }
        }
    }

    let counts = MatchCounts {
        matched_in_scan: tasks.len(),
        scanned: scan_len,
        skipped,
        candidate_total,
        estimated_total: extrapolate(tasks.len(), scan_len, candidate_total, limited),
        limited,
    };
    if limited {
        warn!(
            scanned = counts.scanned,
            candidate_total = counts.candidate_total,
            estimated_total = counts.estimated_total,
            "iteration cap truncated the scan"
        );
    }
    Ok(InterpretedOutcome { tasks, counts })
}

/// Project the in-prefix match ratio onto the full candidate set.
fn extrapolate(matched: usize, scanned: usize, candidate_total: usize, limited: bool) -> usize {
    if !limited {
        return matched;
    }
    if scanned == 0 {
        return 0;
    }
    let ratio = matched as f64 / scanned as f64;
    (ratio * candidate_total as f64).round() as usize
}

/// Codes that mean the target itself is unreachable, not that one record
/// failed.
fn fatal(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::HostNotRunning
            | ErrorCode::PermissionDenied
            | ErrorCode::ScriptTimeout
            | ErrorCode::ScriptTooLarge
            | ErrorCode::InvalidInput
    )
}
