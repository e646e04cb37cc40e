//! Helper bundles: constant JavaScript preludes prepended to generated
//! script bodies.
//!
//! Bundles are cumulative (`Full` ⊇ `Partial` ⊇ `Minimal`). Their byte
//! sizes are tracked separately from the per-call body so a size failure
//! can disclose the helper-vs-body breakdown and callers can trade helper
//! convenience for headroom.

use serde::{Deserialize, Serialize};
use trestle_core::errors::ScriptError;

/// Envelope emitters only. Enough for scripts that build their own payloads.
const MINIMAL_PRELUDE: &str = r#"function emitSuccess(data, startedAt) {
  return JSON.stringify({
    ok: true,
    v: '3',
    data: data,
    query_time_ms: Date.now() - startedAt
  });
}
function emitFailure(err, operation, startedAt) {
  var message = err && err.message ? err.message : String(err);
  var payload = {
    ok: false,
    v: '3',
    error: { message: message, operation: operation },
    query_time_ms: Date.now() - startedAt
  };
  if (err && err.stack) { payload.error.stack = String(err.stack); }
  return JSON.stringify(payload);
}
"#;

/// Record snapshot serializers and id lookups, on top of the emitters.
const PARTIAL_EXTRA: &str = r#"function isoDate(d) {
  return d ? d.toISOString() : null;
}
function taskIsAvailable(t) {
  return t.taskStatus === Task.Status.Available ||
    t.taskStatus === Task.Status.Next ||
    t.taskStatus === Task.Status.DueSoon ||
    t.taskStatus === Task.Status.Overdue;
}
function projectStatusName(status) {
  if (status === Project.Status.Active) { return 'active'; }
  if (status === Project.Status.OnHold) { return 'onHold'; }
  if (status === Project.Status.Done) { return 'done'; }
  return 'dropped';
}
function taskSnapshot(t) {
  return {
    id: t.id.primaryKey,
    name: t.name,
    note: t.note || null,
    completed: t.completed,
    flagged: t.flagged,
    available: taskIsAvailable(t),
    dropped: t.taskStatus === Task.Status.Dropped,
    dueDate: isoDate(t.dueDate),
    deferDate: isoDate(t.deferDate),
    completionDate: isoDate(t.completionDate),
    estimatedMinutes: t.estimatedMinutes == null ? null : t.estimatedMinutes,
    projectId: t.containingProject ? t.containingProject.id.primaryKey : null,
    projectName: t.containingProject ? t.containingProject.name : null,
    tagIds: t.tags.map(function (tag) { return tag.id.primaryKey; })
  };
}
function projectSnapshot(p) {
  return {
    id: p.id.primaryKey,
    name: p.name,
    status: projectStatusName(p.status),
    flagged: p.flagged,
    folderId: p.parentFolder ? p.parentFolder.id.primaryKey : null,
    dueDate: isoDate(p.dueDate),
    taskCount: p.flattenedTasks.filter(function (t) { return !t.completed; }).length
  };
}
function tagSnapshot(tag) {
  return {
    id: tag.id.primaryKey,
    name: tag.name,
    parentId: tag.parent ? tag.parent.id.primaryKey : null
  };
}
function folderSnapshot(f) {
  return {
    id: f.id.primaryKey,
    name: f.name,
    parentId: f.parent ? f.parent.id.primaryKey : null
  };
}
function taskWithId(id) {
  return flattenedTasks.find(function (t) { return t.id.primaryKey === id; }) || null;
}
function projectWithId(id) {
  return flattenedProjects.find(function (p) { return p.id.primaryKey === id; }) || null;
}
function tagWithId(id) {
  return flattenedTags.find(function (t) { return t.id.primaryKey === id; }) || null;
}
function folderWithId(id) {
  return flattenedFolders.find(function (f) { return f.id.primaryKey === id; }) || null;
}
"#;

/// In-process filter evaluation, on top of serializers and lookups.
const FULL_EXTRA: &str = r#"function textMatches(t, needle) {
  var haystack = (t.name + ' ' + (t.note || '')).toLowerCase();
  return haystack.indexOf(needle.toLowerCase()) !== -1;
}
function tagSetMatches(taskTagIds, tagFilter) {
  var has = function (id) { return taskTagIds.indexOf(id) !== -1; };
  if (tagFilter.op === 'AND') { return tagFilter.tags.every(has); }
  if (tagFilter.op === 'OR') { return tagFilter.tags.some(has); }
  return !tagFilter.tags.some(has);
}
function matchesTaskFilter(t, filter, now) {
  if (filter.completed != null && t.completed !== filter.completed) { return false; }
  if (filter.flagged != null && t.flagged !== filter.flagged) { return false; }
  if (filter.available != null && taskIsAvailable(t) !== filter.available) { return false; }
  if (filter.dropped != null && (t.taskStatus === Task.Status.Dropped) !== filter.dropped) { return false; }
  if (filter.projectId != null) {
    var p = t.containingProject;
    if (!p || p.id.primaryKey !== filter.projectId) { return false; }
  }
  if (filter.projectName != null) {
    var cp = t.containingProject;
    if (!cp || cp.name !== filter.projectName) { return false; }
  }
  if (filter.tags != null) {
    var ids = t.tags.map(function (x) { return x.id.primaryKey; });
    if (!tagSetMatches(ids, filter.tags)) { return false; }
  }
  if (filter.search != null && !textMatches(t, filter.search)) { return false; }
  if (filter.dueBefore != null && !(t.dueDate && t.dueDate < new Date(filter.dueBefore))) { return false; }
  if (filter.dueAfter != null && !(t.dueDate && t.dueDate >= new Date(filter.dueAfter))) { return false; }
  if (filter.deferBefore != null && !(t.deferDate && t.deferDate < new Date(filter.deferBefore))) { return false; }
  if (filter.deferAfter != null && !(t.deferDate && t.deferDate >= new Date(filter.deferAfter))) { return false; }
  return true;
}
function matchesProjectFilter(p, filter) {
  if (filter.status != null && projectStatusName(p.status) !== filter.status) { return false; }
  if (filter.folderId != null) {
    var f = p.parentFolder;
    if (!f || f.id.primaryKey !== filter.folderId) { return false; }
  }
  return true;
}
"#;

/// Which helper prelude ships with a generated script.
///
/// Ordered by inclusion so a caller-configured bundle can be upgraded to a
/// script's declared minimum with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperBundle {
    /// Envelope emitters only.
    Minimal,
    /// Emitters plus snapshot serializers and id lookups.
    Partial,
    /// Everything, including in-process filter evaluation.
    Full,
}

impl HelperBundle {
    pub const ALL: [HelperBundle; 3] = [Self::Minimal, Self::Partial, Self::Full];

    /// Parse a config string ("minimal", "partial", "full").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "minimal" => Some(Self::Minimal),
            "partial" => Some(Self::Partial),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Partial => "partial",
            Self::Full => "full",
        }
    }

    /// The constant prelude text. Always ends with a newline, so a body can
    /// be appended directly.
    pub fn prelude(&self) -> String {
        match self {
            Self::Minimal => MINIMAL_PRELUDE.to_owned(),
            Self::Partial => format!("{MINIMAL_PRELUDE}{PARTIAL_EXTRA}"),
            Self::Full => format!("{MINIMAL_PRELUDE}{PARTIAL_EXTRA}{FULL_EXTRA}"),
        }
    }

    /// Prelude size in bytes, without allocating the text.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Minimal => MINIMAL_PRELUDE.len(),
            Self::Partial => MINIMAL_PRELUDE.len() + PARTIAL_EXTRA.len(),
            Self::Full => MINIMAL_PRELUDE.len() + PARTIAL_EXTRA.len() + FULL_EXTRA.len(),
        }
    }
}

/// A fully rendered script: helper prelude plus body, with size accounting.
#[derive(Debug, Clone)]
pub struct Script {
    pub bundle: HelperBundle,
    pub body: String,
}

impl Script {
    pub fn new(bundle: HelperBundle, body: impl Into<String>) -> Self {
        Self {
            bundle,
            body: body.into(),
        }
    }

    pub fn helper_bytes(&self) -> usize {
        self.bundle.byte_len()
    }

    pub fn body_bytes(&self) -> usize {
        self.body.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.helper_bytes() + self.body_bytes()
    }

    /// Produce the complete program text, enforcing the size limit the
    /// target imposes. Failure discloses the helper-vs-body breakdown so
    /// callers know which side to shrink.
    pub fn assemble(&self, max_bytes: usize) -> Result<String, ScriptError> {
        let current_bytes = self.total_bytes();
        if current_bytes > max_bytes {
            return Err(ScriptError::TooLarge {
                current_bytes,
                max_bytes,
                helper_bytes: self.helper_bytes(),
                body_bytes: self.body_bytes(),
            });
        }
        let mut text = self.bundle.prelude();
        text.push_str(&self.body);
        Ok(text)
    }
}
