//! Filter predicates: structured match constraints over the task set.

mod tier;

pub use tier::ExecutionTier;

use crate::records::ProjectStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Set operator for tag-membership constraints. Wire names are the
/// operator spellings the runtime-side filter evaluator switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagOperator {
    /// Task carries every listed tag.
    And,
    /// Task carries at least one listed tag.
    Or,
    /// Task carries none of the listed tags.
    NotIn,
}

/// Tag-set membership constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub op: TagOperator,
    /// Tag ids (not names — name resolution is a cross-entity concern).
    pub tags: Vec<String>,
}

/// Structured constraints over the task set.
///
/// `None` means "unconstrained". The execution tier a filter compiles to
/// depends only on which constraints are active, never on record data.
/// Serializes camelCase: the same JSON is shipped to the runtime-side
/// evaluator as a script parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub flagged: Option<bool>,
    pub available: Option<bool>,
    pub dropped: Option<bool>,
    /// Direct equality on the containing project's id.
    pub project_id: Option<String>,
    /// Containing project by name — requires cross-entity resolution, so it
    /// always forces the interpreted tier.
    pub project_name: Option<String>,
    pub tags: Option<TagFilter>,
    /// Case-insensitive substring over name and note.
    pub search: Option<String>,
    /// Date bounds are half-open: `after` is inclusive, `before` exclusive,
    /// so `[after, before)` expresses a calendar window exactly. A bound
    /// only matches records that have the date at all.
    pub due_before: Option<DateTime<Utc>>,
    pub due_after: Option<DateTime<Utc>>,
    pub defer_before: Option<DateTime<Utc>>,
    pub defer_after: Option<DateTime<Utc>>,
}

/// Constraints over the project set. Small enough to always run bulk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    /// Direct equality on the containing folder's id.
    pub folder_id: Option<String>,
}

impl ProjectFilter {
    /// True when no constraint is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl TaskFilter {
    /// Number of active date-bound comparisons.
    pub fn date_bound_count(&self) -> usize {
        [
            self.due_before.is_some(),
            self.due_after.is_some(),
            self.defer_before.is_some(),
            self.defer_after.is_some(),
        ]
        .iter()
        .filter(|&&b| b)
        .count()
    }

    /// True when no constraint is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
