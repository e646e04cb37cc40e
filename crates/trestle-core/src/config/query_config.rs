use serde::{Deserialize, Serialize};

use super::defaults;

/// Query compilation and post-processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Lookahead window for the "upcoming" mode, in days.
    pub lookahead_days: i64,
    /// Result limit applied when a query does not specify one.
    pub default_limit: usize,
    /// Result limit for priority scoring when the caller does not specify one.
    pub priority_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            lookahead_days: defaults::DEFAULT_LOOKAHEAD_DAYS,
            default_limit: defaults::DEFAULT_QUERY_LIMIT,
            priority_limit: defaults::DEFAULT_PRIORITY_LIMIT,
        }
    }
}
