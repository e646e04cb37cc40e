//! Filter canonicalization, execution-tier classification, and host-side
//! predicate evaluation.

use serde::{Deserialize, Serialize};
use trestle_core::filter::{ExecutionTier, TagOperator, TaskFilter};
use trestle_core::records::Task;

/// A canonicalized filter with its execution tier, assigned exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledFilter {
    pub filter: TaskFilter,
    pub tier: ExecutionTier,
}

/// Canonicalize a filter and classify its execution tier.
///
/// Canonicalization drops constraints that cannot select anything:
/// whitespace-only search text and empty tag lists become unconstrained.
/// Classification is a pure function of the canonical shape — the same
/// filter always lands on the same tier, whatever the data looks like.
pub fn compile(filter: &TaskFilter) -> CompiledFilter {
    let mut filter = filter.clone();

    if let Some(search) = &filter.search {
        let trimmed = search.trim();
        if trimmed.is_empty() {
            filter.search = None;
        } else if trimmed.len() != search.len() {
            filter.search = Some(trimmed.to_owned());
        }
    }
    if let Some(tags) = &filter.tags {
        if tags.tags.is_empty() {
            filter.tags = None;
        }
    }

    let tier = classify(&filter);
    CompiledFilter { filter, tier }
}

/// Bulk iff every active constraint is a direct boolean/equality/tag-set
/// test, with at most one date bound. Substring search, cross-entity name
/// resolution, and multi-clause date ranges pay the interpreted cost.
fn classify(filter: &TaskFilter) -> ExecutionTier {
    if filter.search.is_some() || filter.project_name.is_some() || filter.date_bound_count() >= 2 {
        ExecutionTier::Interpreted
    } else {
        ExecutionTier::Bulk
    }
}

/// Evaluate a filter against one task snapshot, host-side.
///
/// Mirrors the runtime-side evaluator: the interpreted tier probes records
/// and applies this to each snapshot, and the two must agree. Date bounds
/// are half-open (`after` inclusive, `before` exclusive) and only match
/// records that carry the date.
pub fn matches(task: &Task, filter: &TaskFilter) -> bool {
    if let Some(completed) = filter.completed {
        if task.completed != completed {
            return false;
        }
    }
    if let Some(flagged) = filter.flagged {
        if task.flagged != flagged {
            return false;
        }
    }
    if let Some(available) = filter.available {
        if task.available != available {
            return false;
        }
    }
    if let Some(dropped) = filter.dropped {
        if task.dropped != dropped {
            return false;
        }
    }
    if let Some(project_id) = &filter.project_id {
        if task.project_id.as_deref() != Some(project_id.as_str()) {
            return false;
        }
    }
    if let Some(project_name) = &filter.project_name {
        if task.project_name.as_deref() != Some(project_name.as_str()) {
            return false;
        }
    }
    if let Some(tags) = &filter.tags {
        let has = |id: &String| task.tag_ids.contains(id);
        let ok = match tags.op {
            TagOperator::And => tags.tags.iter().all(has),
            TagOperator::Or => tags.tags.iter().any(has),
            TagOperator::NotIn => !tags.tags.iter().any(has),
        };
        if !ok {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let name_hit = task.name.to_lowercase().contains(&needle);
        let note_hit = task
            .note
            .as_ref()
            .is_some_and(|note| note.to_lowercase().contains(&needle));
        if !name_hit && !note_hit {
            return false;
        }
    }
    if let Some(bound) = filter.due_before {
        if !task.due_date.is_some_and(|due| due < bound) {
            return false;
        }
    }
    if let Some(bound) = filter.due_after {
        if !task.due_date.is_some_and(|due| due >= bound) {
            return false;
        }
    }
    if let Some(bound) = filter.defer_before {
        if !task.defer_date.is_some_and(|defer| defer < bound) {
            return false;
        }
    }
    if let Some(bound) = filter.defer_after {
        if !task.defer_date.is_some_and(|defer| defer >= bound) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use trestle_core::filter::TagFilter;

    use super::*;

    #[test]
    fn compile_drops_blank_search() {
        let compiled = compile(&TaskFilter {
            search: Some("   ".into()),
            ..Default::default()
        });
        assert!(compiled.filter.search.is_none());
        assert_eq!(compiled.tier, ExecutionTier::Bulk);
    }

    #[test]
    fn compile_trims_search_text() {
        let compiled = compile(&TaskFilter {
            search: Some("  plumber ".into()),
            ..Default::default()
        });
        assert_eq!(compiled.filter.search.as_deref(), Some("plumber"));
        assert_eq!(compiled.tier, ExecutionTier::Interpreted);
    }

    #[test]
    fn compile_drops_empty_tag_set() {
        let compiled = compile(&TaskFilter {
            tags: Some(TagFilter {
                op: TagOperator::And,
                tags: vec![],
            }),
            ..Default::default()
        });
        assert!(compiled.filter.tags.is_none());
    }
}
