use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project lifecycle status as reported by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Done,
    Dropped,
}

/// Project snapshot as of query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub flagged: bool,
    /// Containing folder, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Open task count at snapshot time.
    #[serde(default)]
    pub task_count: u32,
}
