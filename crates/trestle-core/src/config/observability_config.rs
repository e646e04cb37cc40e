use serde::{Deserialize, Serialize};

use super::defaults;

/// Observability configuration.
///
/// Trestle emits `tracing` events; installing a subscriber is the embedding
/// host's responsibility. These knobs let the host pick sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub log_level: String,
    /// When true, every dispatched script body is logged at debug level.
    pub query_log: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            query_log: defaults::DEFAULT_QUERY_LOG,
        }
    }
}
