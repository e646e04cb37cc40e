//! Stable multi-key sorting over task snapshots.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use trestle_core::records::Task;

/// Sortable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    DueDate,
    DeferDate,
    CompletionDate,
    Flagged,
    EstimatedMinutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of a multi-key sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// Sort tasks by the given keys, in order of significance.
///
/// Stable: ties across all keys keep their input order. Type-aware:
/// case-insensitive text, numeric, boolean true-first, dates by instant.
/// A record missing a key's value sorts after every record that has one,
/// in either direction — direction applies to present values only.
pub fn sort_tasks(tasks: &mut [Task], specs: &[SortSpec]) {
    if specs.is_empty() {
        return;
    }
    tasks.sort_by(|a, b| {
        specs
            .iter()
            .map(|spec| compare_by(a, b, spec))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

fn compare_by(a: &Task, b: &Task, spec: &SortSpec) -> Ordering {
    match spec.key {
        SortKey::Name => apply_direction(
            a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            spec.direction,
        ),
        SortKey::DueDate => compare_present_first(a.due_date, b.due_date, spec.direction),
        SortKey::DeferDate => compare_present_first(a.defer_date, b.defer_date, spec.direction),
        SortKey::CompletionDate => {
            compare_present_first(a.completion_date, b.completion_date, spec.direction)
        }
        // Booleans order true first when ascending.
        SortKey::Flagged => apply_direction(b.flagged.cmp(&a.flagged), spec.direction),
        SortKey::EstimatedMinutes => {
            compare_present_first(a.estimated_minutes, b.estimated_minutes, spec.direction)
        }
    }
}

fn compare_present_first<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => apply_direction(x.cmp(&y), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}
