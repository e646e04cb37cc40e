//! Priority scoring: a weighted heuristic over task urgency signals.
//!
//! The score is an estimate for ranking, not a fact about the record; the
//! weights are tuned for "what should I look at first", nothing more.

use chrono::{DateTime, Utc};
use serde::Serialize;
use trestle_core::constants::SHORT_ESTIMATE_MINUTES;
use trestle_core::records::Task;

/// Per-day overdue weight.
const OVERDUE_BASE: u32 = 100;
const OVERDUE_PER_DAY: u32 = 10;
const OVERDUE_DAYS_CAP: u32 = 200;
const DUE_TODAY: u32 = 80;
const FLAGGED: u32 = 50;
const AVAILABLE: u32 = 30;
const SHORT_ESTIMATE: u32 = 20;

/// A task with its computed priority score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    pub score: u32,
}

/// Score one task against `now`.
///
/// Overdue and due-today are exclusive branches: a task due earlier today
/// counts as overdue, not both. The remaining weights stack.
pub fn priority_score(task: &Task, now: DateTime<Utc>) -> u32 {
    let mut score = 0;

    if task.is_overdue(now) {
        let days_overdue = task
            .due_date
            .map(|due| (now - due).num_days().max(0) as u32)
            .unwrap_or(0);
        score += OVERDUE_BASE + (OVERDUE_PER_DAY * days_overdue).min(OVERDUE_DAYS_CAP);
    } else if task.is_due_today(now) {
        score += DUE_TODAY;
    }

    if task.flagged {
        score += FLAGGED;
    }
    if task.available {
        score += AVAILABLE;
    }
    if task
        .estimated_minutes
        .is_some_and(|minutes| minutes <= SHORT_ESTIMATE_MINUTES)
    {
        score += SHORT_ESTIMATE;
    }
    score
}

/// Rank tasks by score and keep the top `limit`.
///
/// Guarantee: when anything in the input is due strictly today, at least
/// one due-today record survives in the output — the best-scoring one
/// replaces the lowest-scored survivor if none made the cut on score
/// alone. Ties keep input order (stable sort).
pub fn score_for_priority(tasks: &[Task], limit: usize, now: DateTime<Utc>) -> Vec<ScoredTask> {
    if limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<ScoredTask> = tasks
        .iter()
        .map(|task| ScoredTask {
            task: task.clone(),
            score: priority_score(task, now),
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    let cut = scored.len().min(limit);
    let survivors_have_due_today = scored[..cut].iter().any(|s| s.task.is_due_today(now));
    if !survivors_have_due_today {
        let best_due_today = scored[cut..]
            .iter()
            .position(|s| s.task.is_due_today(now))
            .map(|offset| cut + offset);
        if let Some(index) = best_due_today {
            // Replace the lowest-scored survivor, then restore score order.
            let guaranteed = scored.remove(index);
            scored[cut - 1] = guaranteed;
            scored[..cut].sort_by(|a, b| b.score.cmp(&a.score));
        }
    }

    scored.truncate(cut);
    scored
}
