//! Record snapshots: tasks, projects, tags, folders.
//!
//! Every struct here is a read-only snapshot as of query time. Relationships
//! are carried as id cross-references (task→project, task→tags, project→
//! folder, tag/folder→parent), never as live object handles.

mod changes;
mod folder;
mod project;
mod tag;
mod task;

pub use changes::{NewProject, NewTask, TaskChanges};
pub use folder::Folder;
pub use project::{Project, ProjectStatus};
pub use tag::Tag;
pub use task::Task;

use serde::{Deserialize, Serialize};

/// The four record kinds the store exposes. Drives script generation and
/// cache category selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Project,
    Tag,
    Folder,
}

impl EntityKind {
    /// All kinds for iteration.
    pub const ALL: [EntityKind; 4] = [Self::Task, Self::Project, Self::Tag, Self::Folder];

    /// Collection accessor name on the automation runtime side.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Task => "flattenedTasks",
            Self::Project => "flattenedProjects",
            Self::Tag => "flattenedTags",
            Self::Folder => "flattenedFolders",
        }
    }
}
