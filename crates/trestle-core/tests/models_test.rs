use chrono::{TimeZone, Utc};
use serde_json::json;
use trestle_core::envelope::{Envelope, EnvelopeMeta, EnvelopeVersion};
use trestle_core::errors::ErrorCode;
use trestle_core::filter::{TagFilter, TagOperator, TaskFilter};
use trestle_core::records::*;

fn roundtrip<T: serde::Serialize + serde::de::DeserializeOwned>(val: &T) -> T {
    let json = serde_json::to_string(val).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn sample_task() -> Task {
    Task {
        id: "t-1".into(),
        name: "Call plumber".into(),
        note: Some("about the sink".into()),
        completed: false,
        flagged: true,
        available: true,
        dropped: false,
        due_date: Some(Utc.with_ymd_and_hms(2025, 3, 14, 17, 0, 0).unwrap()),
        defer_date: None,
        completion_date: None,
        estimated_minutes: Some(10),
        project_id: Some("p-1".into()),
        project_name: Some("Home".into()),
        tag_ids: vec!["tag-home".into()],
    }
}

#[test]
fn task_roundtrip() {
    let task = sample_task();
    let r = roundtrip(&task);
    assert_eq!(r, task);
}

#[test]
fn task_wire_shape_is_camel_case() {
    let value = serde_json::to_value(sample_task()).unwrap();
    let obj = value.as_object().unwrap();
    assert!(obj.contains_key("dueDate"));
    assert!(obj.contains_key("estimatedMinutes"));
    assert!(obj.contains_key("tagIds"));
    assert!(!obj.contains_key("due_date"));
    // Absent optionals are omitted, not null
    assert!(!obj.contains_key("deferDate"));
}

#[test]
fn task_parses_from_minimal_wire_object() {
    let task: Task = serde_json::from_value(json!({
        "id": "t-2",
        "name": "Water plants",
        "completed": false,
        "flagged": false,
        "available": true
    }))
    .unwrap();
    assert_eq!(task.id, "t-2");
    assert!(task.note.is_none());
    assert!(task.tag_ids.is_empty());
    assert!(!task.dropped);
}

#[test]
fn task_overdue_and_due_today() {
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
    let mut task = sample_task();

    // Due later the same day: today but not overdue
    assert!(!task.is_overdue(now));
    assert!(task.is_due_today(now));

    // Due yesterday: overdue, not today
    task.due_date = Some(Utc.with_ymd_and_hms(2025, 3, 13, 17, 0, 0).unwrap());
    assert!(task.is_overdue(now));
    assert!(!task.is_due_today(now));

    // Completed tasks are never overdue
    task.completed = true;
    assert!(!task.is_overdue(now));

    // No due date at all
    task.completed = false;
    task.due_date = None;
    assert!(!task.is_overdue(now));
    assert!(!task.is_due_today(now));
}

#[test]
fn project_roundtrip_and_status_names() {
    let project = Project {
        id: "p-1".into(),
        name: "Kitchen remodel".into(),
        status: ProjectStatus::OnHold,
        flagged: false,
        folder_id: Some("f-1".into()),
        due_date: None,
        task_count: 12,
    };
    let r = roundtrip(&project);
    assert_eq!(r, project);

    let value = serde_json::to_value(&project).unwrap();
    assert_eq!(value["status"], "onHold");
}

#[test]
fn tag_and_folder_roundtrip() {
    let tag = Tag {
        id: "tag-1".into(),
        name: "errands".into(),
        parent_id: None,
    };
    assert_eq!(roundtrip(&tag), tag);

    let folder = Folder {
        id: "f-1".into(),
        name: "Home".into(),
        parent_id: Some("f-0".into()),
    };
    assert_eq!(roundtrip(&folder), folder);
}

#[test]
fn entity_kind_collection_names() {
    assert_eq!(EntityKind::Task.collection(), "flattenedTasks");
    assert_eq!(EntityKind::Project.collection(), "flattenedProjects");
    assert_eq!(EntityKind::Tag.collection(), "flattenedTags");
    assert_eq!(EntityKind::Folder.collection(), "flattenedFolders");
}

// --- Filters ---

#[test]
fn empty_filter_reports_empty() {
    assert!(TaskFilter::default().is_empty());
    let filter = TaskFilter {
        flagged: Some(true),
        ..Default::default()
    };
    assert!(!filter.is_empty());
}

#[test]
fn date_bound_count_counts_active_bounds() {
    let now = Utc::now();
    let mut filter = TaskFilter::default();
    assert_eq!(filter.date_bound_count(), 0);
    filter.due_before = Some(now);
    assert_eq!(filter.date_bound_count(), 1);
    filter.due_after = Some(now);
    filter.defer_before = Some(now);
    assert_eq!(filter.date_bound_count(), 3);
}

#[test]
fn filter_roundtrip_with_tags() {
    let filter = TaskFilter {
        completed: Some(false),
        tags: Some(TagFilter {
            op: TagOperator::Or,
            tags: vec!["tag-a".into(), "tag-b".into()],
        }),
        search: Some("plumber".into()),
        ..Default::default()
    };
    assert_eq!(roundtrip(&filter), filter);
}

#[test]
fn filter_parses_from_sparse_object() {
    let filter: TaskFilter = serde_json::from_value(json!({"flagged": true})).unwrap();
    assert_eq!(filter.flagged, Some(true));
    assert!(filter.completed.is_none());
    assert!(filter.tags.is_none());
}

// --- Envelope model ---

#[test]
fn envelope_accessors() {
    let ok = Envelope::Success {
        data: json!([1, 2, 3]),
        meta: EnvelopeMeta {
            version: EnvelopeVersion::V3,
            query_time_ms: Some(12),
            metadata: None,
        },
    };
    assert!(ok.is_success());
    assert!(!ok.is_failure());
    assert_eq!(ok.data(), Some(&json!([1, 2, 3])));
    assert_eq!(ok.meta().version, EnvelopeVersion::V3);

    let err = Envelope::Failure {
        code: ErrorCode::NotFound,
        message: "no such task".into(),
        details: None,
        suggestion: Some(ErrorCode::NotFound.suggestion().into()),
        meta: EnvelopeMeta::bare(EnvelopeVersion::Legacy),
    };
    assert!(err.is_failure());
    assert!(err.data().is_none());
    assert_eq!(err.meta().version, EnvelopeVersion::Legacy);
}
