use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task snapshot as of query time.
///
/// Read-only: the layer never holds live references into the automation
/// target, so a `Task` describes the record at the instant the script ran.
/// Field names follow the JavaScript side of the wire (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier assigned by the record store.
    pub id: String,
    pub name: String,
    /// Free-text note, absent when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub completed: bool,
    pub flagged: bool,
    /// Whether the task is actionable right now (not blocked, not deferred).
    /// Computed by the runtime; snapshotted here.
    pub available: bool,
    #[serde(default)]
    pub dropped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    /// Containing project, if the task is not in the inbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Containing project's name, denormalized into the snapshot so
    /// name-based filters can be evaluated host-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Tag cross-references, possibly empty.
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

impl Task {
    /// Whether the task's due date falls before `now` (and it is still open).
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Whether the task is due on the same UTC calendar day as `now`.
    pub fn is_due_today(&self, now: DateTime<Utc>) -> bool {
        self.due_date
            .is_some_and(|due| due.date_naive() == now.date_naive())
    }
}
