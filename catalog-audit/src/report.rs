//! Report serialization contract
//!
//! Field names and nesting are stable; downstream tooling parses them.
//!
//! ```json
//! {
//!   "timestamp": "2025-01-01T00:00:00Z",
//!   "total_queries": 11,
//!   "total_issues": 42,
//!   "total_affected_skus": 17,
//!   "queries": [
//!     {
//!       "query_name": "long-titles",
//!       "description": "...",
//!       "total_issues": 3,
//!       "affected_skus": 3,
//!       "issues": [{ "row": 2, "sku": "A-1", "field": "Title", "severity": "warning",
//!                    "details": "...", "product_type": "MUG" }]
//!     }
//!   ]
//! }
//! ```
//!
//! A query that failed under the degrade policy carries an additional
//! `"error"` string; the key is absent otherwise.

use catalog_common::Issue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::QueryResult;

/// Version of the JSON layout above
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Full scan report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogReport {
    pub timestamp: DateTime<Utc>,
    pub total_queries: usize,
    pub total_issues: usize,
    pub total_affected_skus: usize,
    pub queries: Vec<QueryReport>,
}

/// One query's section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryReport {
    pub query_name: String,
    pub description: String,
    pub total_issues: usize,
    pub affected_skus: usize,
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&QueryResult> for QueryReport {
    fn from(result: &QueryResult) -> Self {
        Self {
            query_name: result.query_name.clone(),
            description: result.description.clone(),
            total_issues: result.total_issues(),
            affected_skus: result.affected_skus(),
            issues: result.issues.clone(),
            error: result.error().map(str::to_string),
        }
    }
}

impl CatalogReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
