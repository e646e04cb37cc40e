use serde::{Deserialize, Serialize};

use super::defaults;

/// Cache manager configuration.
///
/// TTL is a per-category policy: short for volatile list queries, long for
/// expensive aggregate analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch. When off, every lookup is a miss and stores are no-ops.
    pub enabled: bool,
    /// TTL for the "tasks" category in seconds.
    pub tasks_ttl_secs: u64,
    /// TTL for the "projects" category in seconds.
    pub projects_ttl_secs: u64,
    /// TTL for the "tags" category in seconds.
    pub tags_ttl_secs: u64,
    /// TTL for the "folders" category in seconds.
    pub folders_ttl_secs: u64,
    /// TTL for the "analytics" category in seconds.
    pub analytics_ttl_secs: u64,
    /// Entry cap per category cache.
    pub max_entries_per_category: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_CACHE_ENABLED,
            tasks_ttl_secs: defaults::DEFAULT_TASKS_TTL_SECS,
            projects_ttl_secs: defaults::DEFAULT_PROJECTS_TTL_SECS,
            tags_ttl_secs: defaults::DEFAULT_TAGS_TTL_SECS,
            folders_ttl_secs: defaults::DEFAULT_FOLDERS_TTL_SECS,
            analytics_ttl_secs: defaults::DEFAULT_ANALYTICS_TTL_SECS,
            max_entries_per_category: defaults::DEFAULT_MAX_ENTRIES_PER_CATEGORY,
        }
    }
}
