//! Query Engine
//!
//! Owns the plugin registry and runs queries over duplicate-filtered
//! listings.
//!
//! # Execution
//! 1. Duplicate filtering runs once per invocation
//! 2. Plugins run in registration order against the same read-only context
//! 3. Each plugin's outcome is settled by the [`FailurePolicy`]:
//!    - `Degrade`: the failure is recorded in that query's result, the rest run
//!    - `Abort`: the first failure is returned as [`AuditError::PluginExecution`]
//!
//! A panic inside a plugin is caught and handled as a plugin failure.

use catalog_common::config::{AuditConfig, FailurePolicy};
use catalog_common::{CatalogSchema, Listing, RuleSet};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::dedup::{DuplicateFilter, SuppressedListing};
use crate::error::{AuditError, AuditResult};
use crate::queries::builtin_queries;
use crate::types::{PluginError, QueryContext, QueryInfo, QueryPlugin, QueryResult};

/// Output of a full scan
#[derive(Debug, Clone)]
pub struct AuditRun {
    /// One result per registered query, in registration order
    pub results: Vec<QueryResult>,
    /// Listings the queries ran against
    pub filtered_listings: Vec<Listing>,
    pub suppressed: Vec<SuppressedListing>,
}

impl AuditRun {
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    pub fn failed_queries(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    /// Result of a query by name
    pub fn result(&self, name: &str) -> Option<&QueryResult> {
        self.results.iter().find(|r| r.query_name == name)
    }
}

/// Builder for [`QueryEngine`]
///
/// Registration is append-only. Names must be non-empty and unique.
pub struct QueryEngineBuilder {
    plugins: Vec<Arc<dyn QueryPlugin>>,
    failure_policy: FailurePolicy,
    filter: DuplicateFilter,
    schema: CatalogSchema,
    rules: RuleSet,
}

impl Default for QueryEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngineBuilder {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            failure_policy: FailurePolicy::default(),
            filter: DuplicateFilter::default(),
            schema: CatalogSchema::default(),
            rules: RuleSet::default(),
        }
    }

    /// Builder seeded with engine, dedup and rule settings from configuration
    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new()
            .failure_policy(config.engine.failure_policy)
            .duplicate_filter(DuplicateFilter::new(&config.dedup))
            .rules(config.rules.clone())
    }

    /// Register a query plugin
    ///
    /// # Errors
    /// - `InvalidPlugin` if the name is empty
    /// - `DuplicateQuery` if the name is already registered
    pub fn register(mut self, plugin: Arc<dyn QueryPlugin>) -> AuditResult<Self> {
        let name = plugin.name();
        if name.trim().is_empty() {
            return Err(AuditError::InvalidPlugin(
                "query name must not be empty".to_string(),
            ));
        }
        if self.plugins.iter().any(|p| p.name() == name) {
            return Err(AuditError::DuplicateQuery(name.to_string()));
        }
        debug!(query = name, "Registered query");
        self.plugins.push(plugin);
        Ok(self)
    }

    /// Register every built-in query in catalog order
    pub fn with_builtin_queries(self) -> AuditResult<Self> {
        builtin_queries()
            .into_iter()
            .try_fold(self, |builder, plugin| builder.register(plugin))
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn duplicate_filter(mut self, filter: DuplicateFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Attribute schema of the export being audited
    pub fn schema(mut self, schema: CatalogSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn build(self) -> QueryEngine {
        let index = self
            .plugins
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name().to_string(), idx))
            .collect();

        QueryEngine {
            plugins: self.plugins,
            index,
            failure_policy: self.failure_policy,
            filter: self.filter,
            schema: Arc::new(self.schema),
            rules: Arc::new(self.rules),
        }
    }
}

/// Plugin registry and runner
pub struct QueryEngine {
    plugins: Vec<Arc<dyn QueryPlugin>>,
    index: HashMap<String, usize>,
    failure_policy: FailurePolicy,
    filter: DuplicateFilter,
    schema: Arc<CatalogSchema>,
    rules: Arc<RuleSet>,
}

impl QueryEngine {
    pub fn builder() -> QueryEngineBuilder {
        QueryEngineBuilder::new()
    }

    /// Registered queries in registration order
    pub fn list_queries(&self) -> Vec<QueryInfo> {
        self.plugins
            .iter()
            .map(|p| QueryInfo {
                name: p.name().to_string(),
                description: p.description().to_string(),
            })
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Run a single query by name
    ///
    /// # Errors
    /// - `QueryNotFound` if no query has that name (checked before any work)
    /// - `PluginExecution` if the query fails, regardless of failure policy
    pub fn run_one(&self, name: &str, listings: &[Listing]) -> AuditResult<QueryResult> {
        let plugin = self
            .index
            .get(name)
            .map(|&idx| &self.plugins[idx])
            .ok_or_else(|| AuditError::QueryNotFound(name.to_string()))?;

        let outcome = self.filter.filter(listings);
        let ctx = QueryContext::new(&outcome.listings, &self.schema, &self.rules);

        execute(plugin.as_ref(), &ctx).map_err(|source| AuditError::PluginExecution {
            query: name.to_string(),
            source,
        })
    }

    /// Run every registered query sequentially
    pub fn run_all(&self, listings: &[Listing]) -> AuditResult<AuditRun> {
        let started = Instant::now();
        let outcome = self.filter.filter(listings);
        let ctx = QueryContext::new(&outcome.listings, &self.schema, &self.rules);

        let mut results = Vec::with_capacity(self.plugins.len());
        for plugin in &self.plugins {
            let executed = execute(plugin.as_ref(), &ctx);
            results.push(self.settle(plugin.as_ref(), executed)?);
        }

        info!(
            queries = results.len(),
            listings = outcome.listings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scan complete"
        );

        Ok(AuditRun {
            results,
            filtered_listings: outcome.listings,
            suppressed: outcome.suppressed,
        })
    }

    /// Run every registered query on the blocking thread pool
    ///
    /// Results are reassembled in registration order, so output is identical
    /// to [`run_all`](Self::run_all).
    pub async fn run_all_concurrent(&self, listings: &[Listing]) -> AuditResult<AuditRun> {
        let started = Instant::now();
        let outcome = self.filter.filter(listings);
        let shared = Arc::new(outcome.listings);

        let handles: Vec<_> = self
            .plugins
            .iter()
            .map(|plugin| {
                let plugin = Arc::clone(plugin);
                let listings = Arc::clone(&shared);
                let schema = Arc::clone(&self.schema);
                let rules = Arc::clone(&self.rules);
                tokio::task::spawn_blocking(move || {
                    let ctx = QueryContext::new(&listings, &schema, &rules);
                    execute(plugin.as_ref(), &ctx)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (plugin, handle) in self.plugins.iter().zip(handles) {
            let executed = handle
                .await
                .unwrap_or_else(|e| Err(PluginError::Join(e.to_string())));
            results.push(self.settle(plugin.as_ref(), executed)?);
        }

        info!(
            queries = results.len(),
            listings = shared.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Concurrent scan complete"
        );

        let filtered_listings = Arc::try_unwrap(shared).unwrap_or_else(|arc| (*arc).clone());
        Ok(AuditRun {
            results,
            filtered_listings,
            suppressed: outcome.suppressed,
        })
    }

    fn settle(
        &self,
        plugin: &dyn QueryPlugin,
        executed: Result<QueryResult, PluginError>,
    ) -> AuditResult<QueryResult> {
        match executed {
            Ok(result) => Ok(result),
            Err(error) => match self.failure_policy {
                FailurePolicy::Degrade => {
                    warn!(query = plugin.name(), error = %error, "Query failed, continuing");
                    Ok(QueryResult::failed(plugin, &error))
                }
                FailurePolicy::Abort => Err(AuditError::PluginExecution {
                    query: plugin.name().to_string(),
                    source: error,
                }),
            },
        }
    }
}

/// Evaluate one plugin, converting panics into plugin failures
fn execute(plugin: &dyn QueryPlugin, ctx: &QueryContext<'_>) -> Result<QueryResult, PluginError> {
    let started = Instant::now();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let issues = plugin.evaluate(ctx)?;
        let scores = plugin.sku_scores(ctx);
        Ok::<_, PluginError>((issues, scores))
    }));

    let (issues, scores) = match outcome {
        Ok(evaluated) => evaluated?,
        Err(payload) => return Err(PluginError::Panicked(panic_message(payload.as_ref()))),
    };

    debug!(
        query = plugin.name(),
        issues = issues.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Query evaluated"
    );

    let mut result = QueryResult::completed(plugin, issues);
    if let Some(scores) = scores {
        result.sku_scores = scores;
    }
    Ok(result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::{Issue, Severity};

    struct FixedQuery {
        name: &'static str,
    }

    impl QueryPlugin for FixedQuery {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "Flags every listing"
        }
        fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
            Ok(ctx
                .listings
                .iter()
                .map(|l| Issue::for_listing(l, "SKU", Severity::Info, "flagged"))
                .collect())
        }
    }

    fn listings() -> Vec<Listing> {
        vec![Listing::new(1, "A-1", "PT"), Listing::new(2, "B-1", "PT")]
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = QueryEngine::builder()
            .register(Arc::new(FixedQuery { name: " " }))
            .err()
            .unwrap();
        assert!(matches!(err, AuditError::InvalidPlugin(_)));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = QueryEngine::builder()
            .register(Arc::new(FixedQuery { name: "flag" }))
            .unwrap()
            .register(Arc::new(FixedQuery { name: "flag" }))
            .err()
            .unwrap();
        assert!(matches!(err, AuditError::DuplicateQuery(name) if name == "flag"));
    }

    #[test]
    fn test_list_queries_in_registration_order() {
        let engine = QueryEngine::builder()
            .register(Arc::new(FixedQuery { name: "zeta" }))
            .unwrap()
            .register(Arc::new(FixedQuery { name: "alpha" }))
            .unwrap()
            .build();
        let names: Vec<String> = engine.list_queries().into_iter().map(|q| q.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_run_one_unknown_query() {
        let engine = QueryEngine::builder().build();
        let err = engine.run_one("nope", &listings()).unwrap_err();
        assert!(matches!(err, AuditError::QueryNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_run_one() {
        let engine = QueryEngine::builder()
            .register(Arc::new(FixedQuery { name: "flag" }))
            .unwrap()
            .build();
        let result = engine.run_one("flag", &listings()).unwrap();
        assert_eq!(result.total_issues(), 2);
        assert_eq!(result.description, "Flags every listing");
    }

    #[test]
    fn test_builtin_queries_registered() {
        let engine = QueryEngine::builder().with_builtin_queries().unwrap().build();
        assert_eq!(engine.query_count(), 11);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
