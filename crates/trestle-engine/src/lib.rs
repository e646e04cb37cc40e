//! # trestle-engine
//!
//! The execution bridge: turns compiled queries into dispatched automation
//! scripts and parsed, cached, post-processed responses.
//!
//! One worker thread serializes every script against the injected
//! [`AutomationSink`](trestle_core::AutomationSink) — the automation target
//! supports no concurrent sessions. Bulk predicates run as a single
//! aggregate script; interpreted predicates enumerate candidates and probe
//! them one dispatch at a time under the iteration cap, extrapolating the
//! match ratio when the cap truncates the scan. Raw output is parsed into
//! the versioned envelope model, failures are classified into the closed
//! taxonomy, and successful reads populate the category cache that
//! mutations invalidate.

pub mod analytics;
pub mod classify;
pub mod dispatch;
pub mod engine;
pub mod envelope;
pub mod mutation;
pub mod sink;

mod bulk;
mod interpreted;

pub use analytics::{ProjectLoad, WorkloadStats};
pub use classify::classify;
pub use dispatch::Dispatcher;
pub use engine::{QueryEngine, QueryResponse, ResponseMeta, TaskQuery};
pub use envelope::parse_envelope;
pub use interpreted::MatchCounts;
pub use mutation::{BatchOutcome, ItemOutcome};
pub use sink::OsascriptSink;
