use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trestle_core::config::CacheConfig;
use trestle_core::records::EntityKind;

/// Named bucket of cache keys invalidated together.
///
/// The five names are an external contract: every mutation declares which
/// of these it invalidates, every read declares which one it populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tasks,
    Projects,
    Tags,
    Folders,
    /// Aggregate analyses over many records. Longest TTL: expensive to
    /// recompute, tolerant of staleness.
    Analytics,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Tasks,
        Self::Projects,
        Self::Tags,
        Self::Folders,
        Self::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Projects => "projects",
            Self::Tags => "tags",
            Self::Folders => "folders",
            Self::Analytics => "analytics",
        }
    }

    /// The category's TTL policy.
    pub fn ttl(&self, config: &CacheConfig) -> Duration {
        let secs = match self {
            Self::Tasks => config.tasks_ttl_secs,
            Self::Projects => config.projects_ttl_secs,
            Self::Tags => config.tags_ttl_secs,
            Self::Folders => config.folders_ttl_secs,
            Self::Analytics => config.analytics_ttl_secs,
        };
        Duration::from_secs(secs)
    }
}

impl From<EntityKind> for Category {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Task => Self::Tasks,
            EntityKind::Project => Self::Projects,
            EntityKind::Tag => Self::Tags,
            EntityKind::Folder => Self::Folders,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_follows_category_policy() {
        let config = CacheConfig::default();
        assert_eq!(Category::Tasks.ttl(&config), Duration::from_secs(30));
        assert_eq!(Category::Analytics.ttl(&config), Duration::from_secs(600));
        // Volatile lists expire before expensive aggregates
        assert!(Category::Tasks.ttl(&config) < Category::Analytics.ttl(&config));
    }

    #[test]
    fn entity_kinds_map_to_their_category() {
        assert_eq!(Category::from(EntityKind::Task), Category::Tasks);
        assert_eq!(Category::from(EntityKind::Folder), Category::Folders);
    }
}
