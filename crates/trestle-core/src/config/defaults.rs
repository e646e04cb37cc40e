// Single source of truth for all default values.

// --- Dispatch ---
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_ITERATION_CAP: usize = 5_000;
pub const DEFAULT_MAX_SCRIPT_BYTES: usize = 300_000;
pub const DEFAULT_HELPER_BUNDLE: &str = "full";

// --- Cache ---
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_TASKS_TTL_SECS: u64 = 30;
pub const DEFAULT_PROJECTS_TTL_SECS: u64 = 120;
pub const DEFAULT_TAGS_TTL_SECS: u64 = 300;
pub const DEFAULT_FOLDERS_TTL_SECS: u64 = 300;
pub const DEFAULT_ANALYTICS_TTL_SECS: u64 = 600;
pub const DEFAULT_MAX_ENTRIES_PER_CATEGORY: u64 = 512;

// --- Query ---
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 7;
pub const DEFAULT_QUERY_LIMIT: usize = 200;
pub const DEFAULT_PRIORITY_LIMIT: usize = 25;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_QUERY_LOG: bool = false;
