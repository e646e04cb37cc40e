use std::fmt;

/// Transport-level failure raised by a sink before any envelope exists.
///
/// Carries the raw runtime text (stderr, launch failure, bridge error).
/// Classification into the error taxonomy happens downstream, where the
/// message can be inspected against the known failure signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "automation sink failure: {}", self.message)
    }
}

impl std::error::Error for SinkError {}

/// Executes one script against the host automation runtime and returns its
/// raw textual output.
///
/// Implementations must be callable from the dispatch worker thread; the
/// dispatcher serializes calls, so `execute` never runs concurrently with
/// itself on a given sink. Blocking inside `execute` is expected: the
/// dispatcher applies the timeout budget around the call, not inside it.
pub trait AutomationSink: Send + Sync {
    /// Run `source` to completion and return everything the runtime printed.
    ///
    /// A returned `Ok` string may still describe a failure (an envelope with
    /// `ok: false`); `Err` is reserved for transport problems where no
    /// output was produced at all.
    fn execute(&self, source: &str) -> Result<String, SinkError>;
}
