//! Mutations: single and batch record changes with declared cache
//! invalidation.
//!
//! Every mutation dispatches exactly one script per record, strictly in
//! order — the target tolerates no concurrent sessions, and creation-style
//! calls are not idempotent, so nothing here retries. Invalidation happens
//! only after a successful call; a failed mutation leaves the cache as it
//! was.

use serde_json::Value;
use tracing::{debug, info};

use trestle_cache::Category;
use trestle_core::errors::{TrestleError, TrestleResult};
use trestle_core::records::{NewProject, NewTask, Project, Tag, Task, TaskChanges};
use trestle_script::builder::{self, ScriptRequest};

use crate::engine::{non_empty, QueryEngine};

/// Per-item result of a batch mutation.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub id: String,
    /// The record's snapshot (or deletion receipt) on success, the
    /// classified failure otherwise.
    pub result: Result<Value, TrestleError>,
}

/// Outcome of a batch mutation: exactly one entry per input id, in input
/// order. One failed item never aborts the remainder.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub items: Vec<ItemOutcome>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

const TASK_CATEGORIES: [Category; 2] = [Category::Tasks, Category::Analytics];

impl QueryEngine {
    /// Create a task. Invalidates "tasks" and "analytics".
    pub fn create_task(&self, spec: &NewTask) -> TrestleResult<Task> {
        non_empty(&spec.name, "task name")?;
        let task: Task = self.mutate(&builder::create_task(spec), &TASK_CATEGORIES)?;
        info!(id = %task.id, "task created");
        Ok(task)
    }

    /// Update one task. Invalidates "tasks" and "analytics", plus
    /// "projects" when the change moves the task between projects (project
    /// task counts shift).
    pub fn update_task(&self, id: &str, changes: &TaskChanges) -> TrestleResult<Task> {
        non_empty(id, "task id")?;
        if changes.is_empty() {
            return Err(TrestleError::InvalidInput {
                reason: "update changes nothing".to_owned(),
            });
        }
        let categories: &[Category] = if changes.moves_project() {
            &[Category::Tasks, Category::Projects, Category::Analytics]
        } else {
            &TASK_CATEGORIES
        };
        self.mutate(&builder::update_task(id, changes), categories)
    }

    /// Mark one task complete. Invalidates "tasks" and "analytics".
    pub fn complete_task(&self, id: &str) -> TrestleResult<Task> {
        non_empty(id, "task id")?;
        self.mutate(&builder::complete_task(id), &TASK_CATEGORIES)
    }

    /// Delete one task. Invalidates "tasks" and "analytics".
    pub fn delete_task(&self, id: &str) -> TrestleResult<()> {
        non_empty(id, "task id")?;
        let _receipt: Value = self.mutate(&builder::delete_task(id), &TASK_CATEGORIES)?;
        Ok(())
    }

    /// Mark each id complete, strictly in order, one call per id.
    pub fn complete_tasks(&self, ids: &[String]) -> BatchOutcome {
        self.batch(ids, |id| builder::complete_task(id), &TASK_CATEGORIES)
    }

    /// Delete each id, strictly in order, one call per id.
    pub fn delete_tasks(&self, ids: &[String]) -> BatchOutcome {
        self.batch(ids, |id| builder::delete_task(id), &TASK_CATEGORIES)
    }

    /// Apply the same change set to each id, strictly in order.
    ///
    /// An empty change set fails every item up front; a batch of N always
    /// yields exactly N outcomes.
    pub fn update_tasks(&self, ids: &[String], changes: &TaskChanges) -> BatchOutcome {
        if changes.is_empty() {
            let items = ids
                .iter()
                .map(|id| ItemOutcome {
                    id: id.clone(),
                    result: Err(TrestleError::InvalidInput {
                        reason: "update changes nothing".to_owned(),
                    }),
                })
                .collect();
            return BatchOutcome { items };
        }
        self.batch(ids, |id| builder::update_task(id, changes), &TASK_CATEGORIES)
    }

    /// Create a project. A name collision classifies as `DUPLICATE_NAME`.
    /// Invalidates "projects" and "analytics".
    pub fn create_project(&self, spec: &NewProject) -> TrestleResult<Project> {
        non_empty(&spec.name, "project name")?;
        let project: Project = self.mutate(
            &builder::create_project(spec),
            &[Category::Projects, Category::Analytics],
        )?;
        info!(id = %project.id, "project created");
        Ok(project)
    }

    /// Create a tag, optionally nested under `parent_id`. A name collision
    /// classifies as `DUPLICATE_NAME`. Invalidates "tags" and "analytics".
    pub fn create_tag(&self, name: &str, parent_id: Option<&str>) -> TrestleResult<Tag> {
        non_empty(name, "tag name")?;
        self.mutate(
            &builder::create_tag(name, parent_id),
            &[Category::Tags, Category::Analytics],
        )
    }

    /// Dispatch one mutation script and decode its payload; invalidate the
    /// declared categories only on success.
    fn mutate<T: serde::de::DeserializeOwned>(
        &self,
        request: &ScriptRequest,
        categories: &[Category],
    ) -> TrestleResult<T> {
        let (value, _) = self.run_request(request)?;
        let decoded: T = serde_json::from_value(value)?;
        self.cache().invalidate_many(categories);
        Ok(decoded)
    }

    /// Run one script per id, collecting independent outcomes. Invalidation
    /// runs once at the end, and only if something actually changed.
    fn batch<F>(&self, ids: &[String], mut request_for: F, categories: &[Category]) -> BatchOutcome
    where
        F: FnMut(&str) -> ScriptRequest,
    {
        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            let result = self
                .run_request(&request_for(id))
                .map(|(value, _)| value);
            if let Err(err) = &result {
                debug!(id = %id, code = %err.code(), "batch item failed");
            }
            items.push(ItemOutcome {
                id: id.clone(),
                result,
            });
        }
        let outcome = BatchOutcome { items };
        if outcome.succeeded() > 0 {
            self.cache().invalidate_many(categories);
        }
        info!(
            total = outcome.items.len(),
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "batch mutation finished"
        );
        outcome
    }
}
