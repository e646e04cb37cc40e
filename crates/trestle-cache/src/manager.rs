use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;
use serde_json::Value;
use tracing::debug;

use trestle_core::config::CacheConfig;

use crate::categories::Category;

/// One cached query result.
#[derive(Clone)]
struct CacheEntry {
    value: Arc<Value>,
    created_at: Instant,
    ttl: Duration,
}

/// Reads each entry's own TTL instead of a cache-wide constant.
struct PerEntryExpiry;

impl Expiry<String, CacheEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// A served cache hit: the stored value plus its age, for response metadata.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub value: Arc<Value>,
    pub age: Duration,
}

/// Category-scoped query cache.
///
/// One underlying cache per category so `invalidate` drops a whole category
/// atomically with respect to subsequent reads, without touching the
/// others. The only shared mutable state in the system; all methods take
/// `&self` and are safe from any thread.
pub struct QueryCache {
    enabled: bool,
    config: CacheConfig,
    tasks: Cache<String, CacheEntry>,
    projects: Cache<String, CacheEntry>,
    tags: Cache<String, CacheEntry>,
    folders: Cache<String, CacheEntry>,
    analytics: Cache<String, CacheEntry>,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let build = || {
            Cache::builder()
                .max_capacity(config.max_entries_per_category)
                .expire_after(PerEntryExpiry)
                .build()
        };
        Self {
            enabled: config.enabled,
            config: config.clone(),
            tasks: build(),
            projects: build(),
            tags: build(),
            folders: build(),
            analytics: build(),
        }
    }

    fn cache_for(&self, category: Category) -> &Cache<String, CacheEntry> {
        match category {
            Category::Tasks => &self.tasks,
            Category::Projects => &self.projects,
            Category::Tags => &self.tags,
            Category::Folders => &self.folders,
            Category::Analytics => &self.analytics,
        }
    }

    /// Look up a key. Expired entries are misses; a disabled cache always
    /// misses.
    pub fn get(&self, category: Category, key: &str) -> Option<CacheHit> {
        if !self.enabled {
            return None;
        }
        match self.cache_for(category).get(key) {
            Some(entry) => {
                debug!(category = %category, "cache hit");
                Some(CacheHit {
                    value: Arc::clone(&entry.value),
                    age: entry.created_at.elapsed(),
                })
            }
            None => {
                debug!(category = %category, "cache miss");
                None
            }
        }
    }

    /// Store a value under the category's TTL policy.
    pub fn set(&self, category: Category, key: String, value: Value) {
        let ttl = category.ttl(&self.config);
        self.set_with_ttl(category, key, value, ttl);
    }

    /// Store a value with an explicit TTL.
    pub fn set_with_ttl(&self, category: Category, key: String, value: Value, ttl: Duration) {
        if !self.enabled {
            return;
        }
        self.cache_for(category).insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                created_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Drop every entry in one category. Subsequent reads miss immediately.
    pub fn invalidate(&self, category: Category) {
        self.cache_for(category).invalidate_all();
        debug!(category = %category, "cache category invalidated");
    }

    /// Drop every entry in each listed category.
    pub fn invalidate_many(&self, categories: &[Category]) {
        for &category in categories {
            self.invalidate(category);
        }
    }

    /// Drop everything.
    pub fn invalidate_all(&self) {
        for category in Category::ALL {
            self.invalidate(category);
        }
    }

    /// Entries currently held in a category. Eviction is lazy, so this can
    /// briefly overcount after invalidation.
    pub fn entry_count(&self, category: Category) -> u64 {
        self.cache_for(category).entry_count()
    }
}
