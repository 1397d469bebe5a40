//! catalog-audit library interface
//!
//! Query engine for catalog export audits: duplicate suppression, the
//! query plugin registry, bullet scoring, result aggregation and report
//! rendering. The `catalog` binary is a thin CLI over these modules.

pub mod aggregator;
pub mod buildinfo;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod output;
pub mod queries;
pub mod report;
pub mod scoring;
pub mod types;

pub use crate::aggregator::{CatalogSummary, ResultAggregator, SkuScore, TierDistribution};
pub use crate::dedup::{DuplicateFilter, FilterOutcome, SuppressedListing};
pub use crate::engine::{AuditRun, QueryEngine, QueryEngineBuilder};
pub use crate::error::{AuditError, AuditResult};
pub use crate::report::{CatalogReport, QueryReport, REPORT_SCHEMA_VERSION};
pub use crate::scoring::{BulletScore, BulletScorer, Tier};
pub use crate::types::{PluginError, QueryContext, QueryInfo, QueryPlugin, QueryResult, QueryStatus};
