//! Trait seams between the engine and the host automation runtime.

mod sink;

pub use sink::{AutomationSink, SinkError};
