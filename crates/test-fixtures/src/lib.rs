//! Shared test doubles and record builders for the Trestle workspace.
//!
//! Record builders fill every field a test does not name; sink doubles let a
//! test script what the automation host "returns" for each dispatched
//! program. Envelope builders emit the exact wire shapes the runtime
//! produces, so parser tests exercise real text instead of hand-built JSON.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use trestle_core::records::{Folder, Project, ProjectStatus, Tag, Task};
use trestle_core::traits::{AutomationSink, SinkError};

// --- Record builders ---

/// Open, available task with every optional field empty.
pub fn task(id: &str, name: &str) -> Task {
    Task {
        id: id.to_owned(),
        name: name.to_owned(),
        note: None,
        completed: false,
        flagged: false,
        available: true,
        dropped: false,
        due_date: None,
        defer_date: None,
        completion_date: None,
        estimated_minutes: None,
        project_id: None,
        project_name: None,
        tag_ids: Vec::new(),
    }
}

/// `task` with a due date.
pub fn task_due(id: &str, name: &str, due: DateTime<Utc>) -> Task {
    Task {
        due_date: Some(due),
        ..task(id, name)
    }
}

/// Active project with no folder and zero open tasks.
pub fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_owned(),
        name: name.to_owned(),
        status: ProjectStatus::Active,
        flagged: false,
        folder_id: None,
        due_date: None,
        task_count: 0,
    }
}

/// Root-level tag.
pub fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_owned(),
        name: name.to_owned(),
        parent_id: None,
    }
}

/// Root-level folder.
pub fn folder(id: &str, name: &str) -> Folder {
    Folder {
        id: id.to_owned(),
        name: name.to_owned(),
        parent_id: None,
    }
}

/// Unique id for tests that only need distinctness.
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// --- Envelope builders ---

/// Current-shape success envelope, as the script prelude emits it.
pub fn v3_success(data: Value) -> String {
    json!({
        "ok": true,
        "v": "3",
        "data": data,
        "query_time_ms": 4
    })
    .to_string()
}

/// Current-shape failure envelope.
pub fn v3_failure(message: &str) -> String {
    json!({
        "ok": false,
        "v": "3",
        "error": { "message": message, "operation": "test_op" },
        "query_time_ms": 4
    })
    .to_string()
}

/// Legacy success envelope: no `v` tag, boolean `success` discriminator.
pub fn legacy_success(data: Value) -> String {
    json!({
        "success": true,
        "data": data,
        "metadata": { "source": "legacy" }
    })
    .to_string()
}

/// Legacy failure envelope.
pub fn legacy_failure(message: &str) -> String {
    json!({
        "success": false,
        "error": { "message": message },
        "metadata": { "source": "legacy" }
    })
    .to_string()
}

/// Serialize records into the JSON array payload scripts return.
///
/// # Panics
/// Panics if a record fails to serialize.
pub fn records_payload<T: Serialize>(records: &[T]) -> Value {
    serde_json::to_value(records).expect("record fixtures always serialize")
}

// --- Sink doubles ---

/// Sink that records every dispatched script and answers from a canned
/// reply queue. When the queue runs dry, the last reply repeats.
pub struct ScriptedSink {
    scripts: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
}

impl ScriptedSink {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            scripts: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
        }
    }

    /// Sink that gives the same reply to every call.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new(vec![reply.into()])
    }

    /// Every script dispatched so far, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.scripts.lock().unwrap().len()
    }
}

impl AutomationSink for ScriptedSink {
    fn execute(&self, source: &str) -> Result<String, SinkError> {
        self.scripts.lock().unwrap().push(source.to_owned());
        let mut replies = self.replies.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = replies.pop_front() {
            *last = Some(next.clone());
            return Ok(next);
        }
        match last.as_ref() {
            Some(reply) => Ok(reply.clone()),
            None => Err(SinkError::new("scripted sink has no replies")),
        }
    }
}

/// Sink driven by a closure, for tests that branch on script content.
///
/// The closure receives the zero-based call index and the full program text.
pub struct HandlerSink {
    handler: Box<dyn Fn(usize, &str) -> Result<String, SinkError> + Send + Sync>,
    calls: AtomicUsize,
}

impl HandlerSink {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(usize, &str) -> Result<String, SinkError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AutomationSink for HandlerSink {
    fn execute(&self, source: &str) -> Result<String, SinkError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.handler)(index, source)
    }
}

/// Sink that sleeps before answering, for exercising dispatch timeouts.
pub struct SlowSink {
    delay: Duration,
    reply: String,
    calls: AtomicUsize,
}

impl SlowSink {
    pub fn new(delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            delay,
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Calls that have *completed* the sleep, not calls started.
    pub fn completed_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AutomationSink for SlowSink {
    fn execute(&self, _source: &str) -> Result<String, SinkError> {
        thread::sleep(self.delay);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}
