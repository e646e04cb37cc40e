//! # trestle-query
//!
//! The pure half of query execution: turning a mode plus base filter into
//! a canonical predicate with an execution-tier classification, evaluating
//! predicates host-side, and post-processing result sets (stable multi-key
//! sort, field projection, priority scoring).
//!
//! Nothing here touches the automation runtime; `trestle-engine` feeds
//! these functions and dispatches their output.

pub mod compiler;
pub mod modes;
pub mod projection;
pub mod scoring;
pub mod sort;

pub use compiler::{compile, matches, CompiledFilter};
pub use modes::{augment, QueryMode};
pub use projection::project_fields;
pub use scoring::{score_for_priority, ScoredTask};
pub use sort::{sort_tasks, SortDirection, SortKey, SortSpec};
