//! Core Types and Trait Definitions for catalog-audit
//!
//! Defines the query plugin contract and the result type the engine builds
//! from each plugin run.
//!
//! # Plugin contract
//! - Receives a read-only [`QueryContext`] (duplicate-filtered listings,
//!   attribute schema, rule data)
//! - Returns issues in listing order, then field order
//! - Deterministic: no clocks, randomness, I/O or shared mutable state
//! - Independent of the order in which other plugins run

use catalog_common::{CatalogSchema, Issue, Listing, RuleSet};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

// ============================================================================
// Query Plugin Trait
// ============================================================================

/// Read-only inputs shared by every plugin during one run
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    /// Listings that survived duplicate filtering
    pub listings: &'a [Listing],
    pub schema: &'a CatalogSchema,
    pub rules: &'a RuleSet,
}

impl<'a> QueryContext<'a> {
    pub fn new(listings: &'a [Listing], schema: &'a CatalogSchema, rules: &'a RuleSet) -> Self {
        Self {
            listings,
            schema,
            rules,
        }
    }
}

/// One catalog check
///
/// Plugins are registered with the engine under their `name`, which is also
/// the lookup key for `catalog check <name>`.
///
/// # Example
/// ```rust,ignore
/// use catalog_audit::types::{QueryContext, QueryPlugin, PluginError};
/// use catalog_common::{Issue, Severity};
///
/// pub struct EmptyBrandQuery;
///
/// impl QueryPlugin for EmptyBrandQuery {
///     fn name(&self) -> &str { "empty-brand" }
///     fn description(&self) -> &str { "Find listings without a brand" }
///
///     fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
///         Ok(ctx
///             .listings
///             .iter()
///             .filter(|l| !l.has_field("Brand"))
///             .map(|l| Issue::for_listing(l, "Brand", Severity::Warning, "Brand is empty"))
///             .collect())
///     }
/// }
/// ```
pub trait QueryPlugin: Send + Sync {
    /// Stable query name (lookup key)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Evaluate listings and return findings
    ///
    /// # Errors
    /// Returns `PluginError` if the check cannot be completed. The engine
    /// isolates the failure to this query.
    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError>;

    /// Per-SKU numeric scores, for plugins that grade every listing
    ///
    /// Used by the aggregator for tiering. Most plugins do not score.
    fn sku_scores(&self, _ctx: &QueryContext<'_>) -> Option<BTreeMap<String, f64>> {
        None
    }
}

/// Plugin failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginError {
    /// Plugin reported that it could not complete
    #[error("{0}")]
    Failed(String),

    /// Plugin panicked during evaluation
    #[error("panicked: {0}")]
    Panicked(String),

    /// Worker task could not be joined (concurrent runs)
    #[error("task join error: {0}")]
    Join(String),
}

// ============================================================================
// Results
// ============================================================================

/// Name and description of a registered query
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QueryInfo {
    pub name: String,
    pub description: String,
}

/// Completion state of one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Completed,
    /// Plugin failed; the result carries no issues
    Failed { error: String },
}

/// Structured result of one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub query_name: String,
    pub description: String,
    pub issues: Vec<Issue>,
    pub status: QueryStatus,
    /// Scores per SKU (only for scoring plugins)
    pub sku_scores: BTreeMap<String, f64>,
}

impl QueryResult {
    pub fn completed(plugin: &dyn QueryPlugin, issues: Vec<Issue>) -> Self {
        Self {
            query_name: plugin.name().to_string(),
            description: plugin.description().to_string(),
            issues,
            status: QueryStatus::Completed,
            sku_scores: BTreeMap::new(),
        }
    }

    pub fn failed(plugin: &dyn QueryPlugin, error: &PluginError) -> Self {
        Self {
            query_name: plugin.name().to_string(),
            description: plugin.description().to_string(),
            issues: Vec::new(),
            status: QueryStatus::Failed {
                error: error.to_string(),
            },
            sku_scores: BTreeMap::new(),
        }
    }

    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    /// Distinct SKUs appearing in this query's issues
    pub fn affected_sku_set(&self) -> BTreeSet<&str> {
        self.issues.iter().map(|i| i.sku.as_str()).collect()
    }

    pub fn affected_skus(&self) -> usize {
        self.affected_sku_set().len()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, QueryStatus::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            QueryStatus::Failed { error } => Some(error),
            QueryStatus::Completed => None,
        }
    }
}
