//! Catalog export loading
//!
//! The spreadsheet parser lives outside this workspace and hands over its
//! result as JSON: the listing rows plus the attribute schema read from the
//! report's data-definition sheet.
//!
//! Rows that are not real products are dropped on load, as configured by
//! [`ExportConfig`]: blank SKUs always, variation parents and template
//! example rows by default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::listing::Listing;
use crate::schema::CatalogSchema;
use crate::Result;

/// Parsed catalog export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogExport {
    pub listings: Vec<Listing>,
    pub schema: CatalogSchema,
}

impl CatalogExport {
    /// Decode an export from JSON text with the default row filter
    pub fn from_json(content: &str) -> Result<Self> {
        Self::from_json_with(content, &ExportConfig::default())
    }

    /// Decode an export from JSON text
    ///
    /// Rows without a row number get their 1-based position in the file
    /// before any row is dropped.
    pub fn from_json_with(content: &str, options: &ExportConfig) -> Result<Self> {
        let mut export: CatalogExport = serde_json::from_str(content)?;
        for (idx, listing) in export.listings.iter_mut().enumerate() {
            if listing.row_number == 0 {
                listing.row_number = idx + 1;
            }
        }

        let before = export.listings.len();
        export.listings.retain(|l| options.keeps(l));
        let dropped = before - export.listings.len();
        if dropped > 0 {
            info!(dropped, kept = export.listings.len(), "Skipped parent/example rows");
        }
        Ok(export)
    }

    /// Read and decode an export file with the default row filter
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, &ExportConfig::default())
    }

    /// Read and decode an export file
    pub fn load_with(path: &Path, options: &ExportConfig) -> Result<Self> {
        debug!(path = %path.display(), "Loading catalog export");
        let content = std::fs::read_to_string(path)?;
        let export = Self::from_json_with(&content, options)?;
        debug!(
            listings = export.listings.len(),
            product_types = export.schema.product_types.len(),
            "Catalog export loaded"
        );
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FulfillmentChannel;

    #[test]
    fn test_from_json_assigns_missing_row_numbers() {
        let json = r#"{
            "listings": [
                {"sku": "A-1", "fulfillment_channel": "FBA"},
                {"row_number": 40, "sku": "B-2"}
            ],
            "schema": {"common": {"required": ["Title"]}}
        }"#;

        let export = CatalogExport::from_json(json).unwrap();
        assert_eq!(export.listings[0].row_number, 1);
        assert_eq!(export.listings[0].fulfillment_channel, FulfillmentChannel::Fba);
        assert_eq!(export.listings[1].row_number, 40);
        assert_eq!(export.schema.common.required, vec!["Title".to_string()]);
    }

    #[test]
    fn test_empty_object_is_empty_catalog() {
        let export = CatalogExport::from_json("{}").unwrap();
        assert!(export.listings.is_empty());
        assert!(export.schema.product_types.is_empty());
    }

    const MIXED_ROWS: &str = r#"{
        "listings": [
            {"sku": "ABC123"},
            {"sku": "P-1", "parentage": "Parent"},
            {"sku": "P-1-RED", "parentage": "child", "parent_sku": "P-1"},
            {"sku": "  "},
            {"sku": "test"},
            {"sku": "Q-7"}
        ]
    }"#;

    fn skus(export: &CatalogExport) -> Vec<&str> {
        export.listings.iter().map(|l| l.sku.as_str()).collect()
    }

    #[test]
    fn test_parents_and_examples_skipped_by_default() {
        let export = CatalogExport::from_json(MIXED_ROWS).unwrap();
        assert_eq!(skus(&export), vec!["P-1-RED", "Q-7"]);
        assert_eq!(export.listings[0].row_number, 3);
        assert_eq!(export.listings[1].row_number, 6);
    }

    #[test]
    fn test_row_filters_can_be_disabled() {
        let options = ExportConfig {
            skip_parents: false,
            skip_examples: false,
            ..ExportConfig::default()
        };
        let export = CatalogExport::from_json_with(MIXED_ROWS, &options).unwrap();
        assert_eq!(skus(&export), vec!["ABC123", "P-1", "P-1-RED", "test", "Q-7"]);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(CatalogExport::from_json("{\"listings\": [").is_err());
    }
}
