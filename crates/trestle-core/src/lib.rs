//! # trestle-core
//!
//! Foundation crate for the Trestle automation query layer.
//! Defines record snapshots, filter predicates, the result envelope model,
//! the error taxonomy, configuration, and the sink trait.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod envelope;
pub mod errors;
pub mod filter;
pub mod records;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TrestleConfig;
pub use envelope::{Envelope, EnvelopeMeta, EnvelopeVersion};
pub use errors::{ErrorCode, TrestleError, TrestleResult};
pub use filter::{ExecutionTier, ProjectFilter, TagFilter, TagOperator, TaskFilter};
pub use records::{
    EntityKind, Folder, NewProject, NewTask, Project, ProjectStatus, Tag, Task, TaskChanges,
};
pub use traits::{AutomationSink, SinkError};
