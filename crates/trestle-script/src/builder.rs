//! Generated scripts for every query and mutation operation.
//!
//! Each builder returns a [`ScriptRequest`]: a body template plus parameter
//! bindings. Bodies reference bare symbols (`filter`, `taskId`, `spec`);
//! the bindings become `const` declarations prepended at render time, so no
//! body ever splices a value into itself. Every body funnels its outcome
//! through the envelope emitters and labels failures with the bound `op`.

use serde_json::{json, Value};
use trestle_core::errors::ScriptError;
use trestle_core::filter::{ProjectFilter, TaskFilter};
use trestle_core::records::{NewProject, NewTask, TaskChanges};

use crate::helpers::HelperBundle;
use crate::template::{declare_parameters, render, validate, Params, ValidationReport};

/// One operation's script: body template, minimum helper bundle, bindings.
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    /// Operation name: failure label on the runtime side, log field here.
    pub name: &'static str,
    /// Smallest bundle whose helpers the body calls.
    pub bundle: HelperBundle,
    template: &'static str,
    params: Params,
}

impl ScriptRequest {
    fn new(name: &'static str, bundle: HelperBundle, template: &'static str) -> Self {
        let mut request = Self {
            name,
            bundle,
            template,
            params: Params::new(),
        };
        // Every body labels failures with the operation name.
        request.params.insert("op".to_owned(), json!(name));
        request
    }

    fn bind(mut self, key: &str, value: Value) -> Self {
        self.params.insert(key.to_owned(), value);
        self
    }

    pub fn template(&self) -> &str {
        self.template
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Check the declarations-plus-body text against the bindings.
    pub fn validate(&self) -> ValidationReport {
        validate(&self.full_template(), &self.params)
    }

    /// Render declarations followed by the body, every placeholder bound.
    pub fn render_body(&self) -> Result<String, ScriptError> {
        render(&self.full_template(), &self.params)
    }

    fn full_template(&self) -> String {
        let mut text = declare_parameters(&self.params);
        text.push_str(self.template);
        text
    }
}

// === Query bodies ===

const LIST_TASKS: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const now = new Date();
    const out = [];
    const all = flattenedTasks;
    for (let i = 0; i < all.length; i++) {
      const t = all[i];
      if (!matchesTaskFilter(t, filter, now)) { continue; }
      out.push(taskSnapshot(t));
      if (out.length >= limit) { break; }
    }
    return emitSuccess(out, startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const TASK_BY_ID: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const t = taskWithId(taskId);
    if (!t) { return emitFailure('task not found: ' + taskId, op, startedAt); }
    return emitSuccess(taskSnapshot(t), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const ENUMERATE_TASK_IDS: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const ids = [];
    const all = flattenedTasks;
    for (let i = 0; i < all.length; i++) { ids.push(all[i].id.primaryKey); }
    return emitSuccess(ids, startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const LIST_PROJECTS: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const out = [];
    const all = flattenedProjects;
    for (let i = 0; i < all.length; i++) {
      if (matchesProjectFilter(all[i], filter)) { out.push(projectSnapshot(all[i])); }
    }
    return emitSuccess(out, startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const LIST_TAGS: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    return emitSuccess(flattenedTags.map(function (t) { return tagSnapshot(t); }), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const LIST_FOLDERS: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    return emitSuccess(flattenedFolders.map(function (f) { return folderSnapshot(f); }), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const WORKLOAD_STATS: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const now = new Date();
    const dayStart = new Date(now.getFullYear(), now.getMonth(), now.getDate());
    const dayEnd = new Date(dayStart.getTime() + 86400000);
    const stats = {
      totalTasks: 0,
      completed: 0,
      overdue: 0,
      dueToday: 0,
      flagged: 0,
      available: 0,
      byProject: {}
    };
    const all = flattenedTasks;
    for (let i = 0; i < all.length; i++) {
      const t = all[i];
      stats.totalTasks += 1;
      if (t.completed) { stats.completed += 1; continue; }
      if (t.dueDate && t.dueDate < now) { stats.overdue += 1; }
      if (t.dueDate && t.dueDate >= dayStart && t.dueDate < dayEnd) { stats.dueToday += 1; }
      if (t.flagged) { stats.flagged += 1; }
      if (taskIsAvailable(t)) { stats.available += 1; }
      const p = t.containingProject;
      if (p) {
        const key = p.id.primaryKey;
        if (!stats.byProject[key]) { stats.byProject[key] = { name: p.name, remaining: 0 }; }
        stats.byProject[key].remaining += 1;
      }
    }
    return emitSuccess(stats, startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

// === Mutation bodies ===

const CREATE_TASK: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    let target = inbox.ending;
    if (spec.projectId != null) {
      const project = projectWithId(spec.projectId);
      if (!project) { return emitFailure('project not found: ' + spec.projectId, op, startedAt); }
      target = project.ending;
    }
    const task = new Task(spec.name, target);
    if (spec.note != null) { task.note = spec.note; }
    if (spec.flagged) { task.flagged = true; }
    if (spec.dueDate != null) { task.dueDate = new Date(spec.dueDate); }
    if (spec.deferDate != null) { task.deferDate = new Date(spec.deferDate); }
    if (spec.estimatedMinutes != null) { task.estimatedMinutes = spec.estimatedMinutes; }
    if (spec.tagIds != null) {
      for (let i = 0; i < spec.tagIds.length; i++) {
        const tag = tagWithId(spec.tagIds[i]);
        if (tag) { task.addTag(tag); }
      }
    }
    return emitSuccess(taskSnapshot(task), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const UPDATE_TASK: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const task = taskWithId(taskId);
    if (!task) { return emitFailure('task not found: ' + taskId, op, startedAt); }
    if (changes.name != null) { task.name = changes.name; }
    if (changes.note != null) { task.note = changes.note; }
    if (changes.flagged != null) { task.flagged = changes.flagged; }
    if (changes.dueDate != null) { task.dueDate = new Date(changes.dueDate); }
    if (changes.deferDate != null) { task.deferDate = new Date(changes.deferDate); }
    if (changes.estimatedMinutes != null) { task.estimatedMinutes = changes.estimatedMinutes; }
    if (changes.projectId != null) {
      const project = projectWithId(changes.projectId);
      if (!project) { return emitFailure('project not found: ' + changes.projectId, op, startedAt); }
      moveTasks([task], project.ending);
    }
    if (changes.tagIds != null) {
      task.clearTags();
      for (let i = 0; i < changes.tagIds.length; i++) {
        const tag = tagWithId(changes.tagIds[i]);
        if (tag) { task.addTag(tag); }
      }
    }
    return emitSuccess(taskSnapshot(task), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const COMPLETE_TASK: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const task = taskWithId(taskId);
    if (!task) { return emitFailure('task not found: ' + taskId, op, startedAt); }
    task.markComplete();
    return emitSuccess(taskSnapshot(task), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const DELETE_TASK: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const task = taskWithId(taskId);
    if (!task) { return emitFailure('task not found: ' + taskId, op, startedAt); }
    deleteObject(task);
    return emitSuccess({ id: taskId, deleted: true }, startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const CREATE_PROJECT: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const existing = flattenedProjects.find(function (p) { return p.name === spec.name; });
    if (existing) { return emitFailure('duplicate project name: ' + spec.name, op, startedAt); }
    let position = library.ending;
    if (spec.folderId != null) {
      const folder = folderWithId(spec.folderId);
      if (!folder) { return emitFailure('folder not found: ' + spec.folderId, op, startedAt); }
      position = folder.ending;
    }
    const project = new Project(spec.name, position);
    if (spec.note != null) { project.note = spec.note; }
    return emitSuccess(projectSnapshot(project), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

const CREATE_TAG: &str = r#"(() => {
  const startedAt = Date.now();
  try {
    const existing = flattenedTags.find(function (t) { return t.name === tagName; });
    if (existing) { return emitFailure('duplicate tag name: ' + tagName, op, startedAt); }
    let position = tags.ending;
    if (parentId != null) {
      const parent = tagWithId(parentId);
      if (!parent) { return emitFailure('tag not found: ' + parentId, op, startedAt); }
      position = parent.ending;
    }
    const tag = new Tag(tagName, position);
    return emitSuccess(tagSnapshot(tag), startedAt);
  } catch (err) {
    return emitFailure(err, op, startedAt);
  }
})();
"#;

// === Builders ===

/// Bulk task list: the runtime applies `filter` in-process and returns up
/// to `limit` snapshots.
pub fn list_tasks(filter: &TaskFilter, limit: usize) -> ScriptRequest {
    ScriptRequest::new("list_tasks", HelperBundle::Full, LIST_TASKS)
        .bind("filter", serde_json::to_value(filter).unwrap_or_default())
        .bind("limit", json!(limit))
}

/// Single task fetch by id.
pub fn get_task(id: &str) -> ScriptRequest {
    ScriptRequest::new("get_task", HelperBundle::Partial, TASK_BY_ID).bind("taskId", json!(id))
}

/// Candidate-id enumeration for the interpreted tier.
pub fn enumerate_task_ids() -> ScriptRequest {
    ScriptRequest::new("enumerate_task_ids", HelperBundle::Minimal, ENUMERATE_TASK_IDS)
}

/// Per-record probe for the interpreted tier: one dispatch per candidate.
pub fn probe_task(id: &str) -> ScriptRequest {
    ScriptRequest::new("probe_task", HelperBundle::Partial, TASK_BY_ID).bind("taskId", json!(id))
}

pub fn list_projects(filter: &ProjectFilter) -> ScriptRequest {
    ScriptRequest::new("list_projects", HelperBundle::Full, LIST_PROJECTS)
        .bind("filter", serde_json::to_value(filter).unwrap_or_default())
}

pub fn list_tags() -> ScriptRequest {
    ScriptRequest::new("list_tags", HelperBundle::Partial, LIST_TAGS)
}

pub fn list_folders() -> ScriptRequest {
    ScriptRequest::new("list_folders", HelperBundle::Partial, LIST_FOLDERS)
}

/// Bulk aggregate over the whole task set: totals, overdue/due-today/
/// flagged/available counts, remaining work per project.
pub fn workload_stats() -> ScriptRequest {
    ScriptRequest::new("workload_stats", HelperBundle::Partial, WORKLOAD_STATS)
}

pub fn create_task(spec: &NewTask) -> ScriptRequest {
    ScriptRequest::new("create_task", HelperBundle::Partial, CREATE_TASK)
        .bind("spec", serde_json::to_value(spec).unwrap_or_default())
}

pub fn update_task(id: &str, changes: &TaskChanges) -> ScriptRequest {
    ScriptRequest::new("update_task", HelperBundle::Partial, UPDATE_TASK)
        .bind("taskId", json!(id))
        .bind("changes", serde_json::to_value(changes).unwrap_or_default())
}

pub fn complete_task(id: &str) -> ScriptRequest {
    ScriptRequest::new("complete_task", HelperBundle::Partial, COMPLETE_TASK)
        .bind("taskId", json!(id))
}

pub fn delete_task(id: &str) -> ScriptRequest {
    ScriptRequest::new("delete_task", HelperBundle::Partial, DELETE_TASK).bind("taskId", json!(id))
}

pub fn create_project(spec: &NewProject) -> ScriptRequest {
    ScriptRequest::new("create_project", HelperBundle::Partial, CREATE_PROJECT)
        .bind("spec", serde_json::to_value(spec).unwrap_or_default())
}

pub fn create_tag(name: &str, parent_id: Option<&str>) -> ScriptRequest {
    ScriptRequest::new("create_tag", HelperBundle::Partial, CREATE_TAG)
        .bind("tagName", json!(name))
        .bind("parentId", json!(parent_id))
}
