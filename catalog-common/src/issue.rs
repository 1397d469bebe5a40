//! Audit findings

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::listing::Listing;

/// Issue severity
///
/// Serialized lowercase; part of the report contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed (missing mandatory data, suppression risk)
    Required,
    /// Should be fixed
    Warning,
    /// Informational finding
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding produced by one query invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Source row of the implicated listing
    pub row: usize,
    pub sku: String,
    /// Attribute or column implicated
    pub field: String,
    pub severity: Severity,
    /// Human-readable explanation
    pub details: String,
    pub product_type: String,
}

impl Issue {
    /// Create an issue anchored to a listing
    pub fn for_listing(
        listing: &Listing,
        field: impl Into<String>,
        severity: Severity,
        details: impl Into<String>,
    ) -> Self {
        Self {
            row: listing.row_number,
            sku: listing.sku.clone(),
            field: field.into(),
            severity,
            details: details.into(),
            product_type: listing.product_type.clone(),
        }
    }
}
