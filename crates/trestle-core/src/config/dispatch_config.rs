use serde::{Deserialize, Serialize};

use super::defaults;

/// Execution bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Wall-clock budget per dispatched script, in milliseconds.
    pub timeout_ms: u64,
    /// Interpreted-tier iteration cap: at most this many candidates are
    /// scanned before the match ratio is extrapolated.
    pub iteration_cap: usize,
    /// Maximum program-text size (helpers + body) accepted by the target.
    pub max_script_bytes: usize,
    /// Helper bundle shipped with generated scripts: "minimal", "partial"
    /// or "full".
    pub helper_bundle: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::DEFAULT_TIMEOUT_MS,
            iteration_cap: defaults::DEFAULT_ITERATION_CAP,
            max_script_bytes: defaults::DEFAULT_MAX_SCRIPT_BYTES,
            helper_bundle: defaults::DEFAULT_HELPER_BUNDLE.to_string(),
        }
    }
}
