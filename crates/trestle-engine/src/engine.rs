//! Query orchestration: compile, look up, dispatch, post-process, store.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use trestle_cache::{fingerprint, CacheHit, Category, QueryCache};
use trestle_core::config::TrestleConfig;
use trestle_core::constants::{MAX_ITERATION_CAP, MAX_SCRIPT_BYTES};
use trestle_core::envelope::EnvelopeMeta;
use trestle_core::errors::{TrestleError, TrestleResult};
use trestle_core::filter::{ExecutionTier, ProjectFilter, TaskFilter};
use trestle_core::records::{Folder, Project, Tag, Task};
use trestle_core::AutomationSink;
use trestle_query::{
    augment, compile, project_fields, score_for_priority, sort_tasks, QueryMode, ScoredTask,
    SortSpec,
};
use trestle_script::builder::{self, ScriptRequest};
use trestle_script::{HelperBundle, Script};

use crate::dispatch::Dispatcher;
use crate::envelope::{into_result, parse_envelope};
use crate::interpreted::MatchCounts;
use crate::{bulk, interpreted};

/// One task query as the caller poses it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskQuery {
    /// Named mode merged over the filter; absent passes the filter through.
    pub mode: Option<QueryMode>,
    pub filter: TaskFilter,
    /// Explicit sort; empty defers to the mode's default sort.
    pub sort: Vec<SortSpec>,
    /// Projection; empty returns full objects.
    pub fields: Vec<String>,
    /// Result limit; absent uses `query.default_limit`.
    pub limit: Option<usize>,
}

/// How a read was answered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseMeta {
    pub tier: ExecutionTier,
    pub from_cache: bool,
    /// Age of the served entry; only present on cache hits.
    pub cache_age_ms: Option<u64>,
    /// Runtime-reported execution time; only for fresh single-dispatch reads.
    pub query_time_ms: Option<u64>,
    /// Scan accounting for interpreted-tier answers, cached with the rows.
    pub counts: Option<MatchCounts>,
}

impl ResponseMeta {
    pub(crate) fn fresh(tier: ExecutionTier) -> Self {
        Self {
            tier,
            from_cache: false,
            cache_age_ms: None,
            query_time_ms: None,
            counts: None,
        }
    }

    pub(crate) fn hit(tier: ExecutionTier, hit: &CacheHit) -> Self {
        Self {
            tier,
            from_cache: true,
            cache_age_ms: Some(hit.age.as_millis() as u64),
            query_time_ms: None,
            counts: None,
        }
    }
}

/// Rows plus response metadata for [`QueryEngine::query_tasks`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub rows: Vec<Value>,
    pub meta: ResponseMeta,
}

/// Cached form of a `query_tasks` answer: final rows plus scan accounting.
#[derive(Serialize, Deserialize)]
struct CachedTasks {
    rows: Vec<Value>,
    counts: Option<MatchCounts>,
}

/// The orchestrator: owns the dispatcher, the cache, and the configuration.
///
/// Every method takes `&self`; one engine is meant to be shared behind an
/// `Arc` for the life of the process. Queries flow compile → cache lookup →
/// dispatch → envelope parse → post-process → cache store; mutations flow
/// dispatch → envelope parse → declared invalidation.
pub struct QueryEngine {
    dispatcher: Dispatcher,
    cache: QueryCache,
    config: TrestleConfig,
    default_bundle: HelperBundle,
    iteration_cap: usize,
    max_script_bytes: usize,
}

impl QueryEngine {
    /// Build an engine over `sink`. Configured ceilings are clamped to the
    /// hard limits the target enforces.
    pub fn new(sink: Arc<dyn AutomationSink>, config: TrestleConfig) -> Self {
        let default_bundle =
            HelperBundle::from_name(&config.dispatch.helper_bundle).unwrap_or_else(|| {
                warn!(
                    bundle = %config.dispatch.helper_bundle,
                    "unknown helper bundle name, using full"
                );
                HelperBundle::Full
            });
        let iteration_cap = config.dispatch.iteration_cap.min(MAX_ITERATION_CAP);
        let max_script_bytes = config.dispatch.max_script_bytes.min(MAX_SCRIPT_BYTES);
        Self {
            dispatcher: Dispatcher::new(sink, config.dispatch.timeout_ms),
            cache: QueryCache::new(&config.cache),
            config,
            default_bundle,
            iteration_cap,
            max_script_bytes,
        }
    }

    pub fn config(&self) -> &TrestleConfig {
        &self.config
    }

    /// The category cache. Exposed so embedding hosts can invalidate on
    /// external change notifications.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub(crate) fn iteration_cap(&self) -> usize {
        self.iteration_cap
    }

    /// Render, assemble, and dispatch one script; parse and unwrap the
    /// output. The helper bundle is the configured default upgraded to the
    /// script's declared minimum.
    pub(crate) fn run_request(
        &self,
        request: &ScriptRequest,
    ) -> TrestleResult<(Value, EnvelopeMeta)> {
        let body = request.render_body()?;
        if self.config.observability.query_log {
            debug!(op = request.name, body = %body, "dispatching script");
        }
        let bundle = self.default_bundle.max(request.bundle);
        let source = Script::new(bundle, body).assemble(self.max_script_bytes)?;
        let raw = self.dispatcher.run(source)?;
        let envelope = parse_envelope(&raw, self.dispatcher.timeout_ms())?;
        into_result(envelope, self.dispatcher.timeout_ms())
    }

    /// Serve from cache or fetch, decode, and store. The decoded type is
    /// what gets cached, so a hit never re-touches the runtime.
    pub(crate) fn cached_read<T, F>(
        &self,
        category: Category,
        key: String,
        fetch: F,
    ) -> TrestleResult<(T, ResponseMeta)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> TrestleResult<(Value, EnvelopeMeta)>,
    {
        if let Some(hit) = self.cache.get(category, &key) {
            match serde_json::from_value::<T>(Value::clone(&hit.value)) {
                Ok(value) => return Ok((value, ResponseMeta::hit(ExecutionTier::Bulk, &hit))),
                Err(err) => {
                    debug!(category = %category, error = %err, "discarding undecodable cache entry");
                }
            }
        }
        let (value, meta) = fetch()?;
        let decoded: T = serde_json::from_value(value)?;
        self.cache.set(category, key, serde_json::to_value(&decoded)?);
        Ok((
            decoded,
            ResponseMeta {
                query_time_ms: meta.query_time_ms,
                ..ResponseMeta::fresh(ExecutionTier::Bulk)
            },
        ))
    }

    /// Execute one task query: compile, serve from the "tasks" category or
    /// dispatch on the compiled tier, then sort, project, and store.
    pub fn query_tasks(&self, query: &TaskQuery) -> TrestleResult<QueryResponse> {
        let limit = query.limit.unwrap_or(self.config.query.default_limit);
        let now = Utc::now();
        let (augmented, default_sort) = augment(
            query.mode,
            now,
            self.config.query.lookahead_days,
            &query.filter,
        );
        let sort = if query.sort.is_empty() {
            default_sort
        } else {
            query.sort.clone()
        };
        let compiled = compile(&augmented);

        // Keyed on the request as posed, not the augmented filter: mode
        // windows embed `now`, which would give every call a fresh key.
        let canonical_base = compile(&query.filter).filter;
        let key = fingerprint(&(
            "query_tasks",
            &query.mode,
            &canonical_base,
            &sort,
            &query.fields,
            limit,
        ))?;
        if let Some(hit) = self.cache.get(Category::Tasks, &key) {
            match serde_json::from_value::<CachedTasks>(Value::clone(&hit.value)) {
                Ok(cached) => {
                    return Ok(QueryResponse {
                        rows: cached.rows,
                        meta: ResponseMeta {
                            counts: cached.counts,
                            ..ResponseMeta::hit(compiled.tier, &hit)
                        },
                    });
                }
                Err(err) => debug!(error = %err, "discarding undecodable cache entry"),
            }
        }

        let (rows, counts, query_time_ms) = match compiled.tier {
            ExecutionTier::Bulk => {
                let outcome = bulk::run(self, &compiled.filter, limit)?;
                let mut tasks = outcome.tasks;
                sort_tasks(&mut tasks, &sort);
                (
                    project_fields(&tasks, &query.fields),
                    None,
                    outcome.query_time_ms,
                )
            }
            ExecutionTier::Interpreted => {
                let outcome = interpreted::run(self, &compiled.filter)?;
                let mut tasks = outcome.tasks;
                sort_tasks(&mut tasks, &sort);
                tasks.truncate(limit);
                (
                    project_fields(&tasks, &query.fields),
                    Some(outcome.counts),
                    None,
                )
            }
        };

        let entry = CachedTasks { rows, counts };
        self.cache
            .set(Category::Tasks, key, serde_json::to_value(&entry)?);
        Ok(QueryResponse {
            rows: entry.rows,
            meta: ResponseMeta {
                query_time_ms,
                counts,
                ..ResponseMeta::fresh(compiled.tier)
            },
        })
    }

    /// Fetch one task by id, through the "tasks" category.
    pub fn get_task(&self, id: &str) -> TrestleResult<(Task, ResponseMeta)> {
        let id = non_empty(id, "task id")?;
        let key = fingerprint(&("get_task", id))?;
        self.cached_read(Category::Tasks, key, || {
            self.run_request(&builder::get_task(id))
        })
    }

    /// List projects matching `filter`, through the "projects" category.
    pub fn list_projects(
        &self,
        filter: &ProjectFilter,
    ) -> TrestleResult<(Vec<Project>, ResponseMeta)> {
        let key = fingerprint(&("list_projects", filter))?;
        self.cached_read(Category::Projects, key, || {
            self.run_request(&builder::list_projects(filter))
        })
    }

    /// List every tag, through the "tags" category.
    pub fn list_tags(&self) -> TrestleResult<(Vec<Tag>, ResponseMeta)> {
        let key = fingerprint(&"list_tags")?;
        self.cached_read(Category::Tags, key, || {
            self.run_request(&builder::list_tags())
        })
    }

    /// List every folder, through the "folders" category.
    pub fn list_folders(&self) -> TrestleResult<(Vec<Folder>, ResponseMeta)> {
        let key = fingerprint(&"list_folders")?;
        self.cached_read(Category::Folders, key, || {
            self.run_request(&builder::list_folders())
        })
    }

    /// Open tasks ranked by priority score against the current instant.
    ///
    /// The candidate rows ride the cached `query_tasks` path; the scores are
    /// computed fresh on every call because they depend on `now`.
    pub fn priority_tasks(
        &self,
        filter: &TaskFilter,
        limit: Option<usize>,
    ) -> TrestleResult<(Vec<ScoredTask>, ResponseMeta)> {
        let limit = limit.unwrap_or(self.config.query.priority_limit);
        let mut base = filter.clone();
        if base.completed.is_none() {
            base.completed = Some(false);
        }
        let query = TaskQuery {
            filter: base,
            ..TaskQuery::default()
        };
        let response = self.query_tasks(&query)?;
        let tasks: Vec<Task> = serde_json::from_value(Value::Array(response.rows))?;
        let scored = score_for_priority(&tasks, limit, Utc::now());
        Ok((scored, response.meta))
    }
}

pub(crate) fn non_empty<'a>(text: &'a str, what: &str) -> TrestleResult<&'a str> {
    if text.trim().is_empty() {
        return Err(TrestleError::InvalidInput {
            reason: format!("{what} is empty"),
        });
    }
    Ok(text)
}
