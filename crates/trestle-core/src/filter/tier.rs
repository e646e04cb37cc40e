use serde::{Deserialize, Serialize};

/// Execution substrate for a compiled predicate.
///
/// Assigned once per predicate by the filter compiler; a pure function of
/// predicate shape, never of data contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionTier {
    /// One aggregate call iterating the full record set in-process. Marginal
    /// per-field cost is near zero.
    Bulk,
    /// Each record read is a separately dispatched call with high fixed
    /// overhead; subject to the iteration cap.
    Interpreted,
}

impl ExecutionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bulk => "bulk",
            Self::Interpreted => "interpreted",
        }
    }
}
