//! Test Helper Utilities
//!
//! Shared fixtures for catalog-audit integration tests

#![allow(dead_code)]

use catalog_audit::{PluginError, QueryContext, QueryPlugin};
use catalog_common::{CatalogExport, CatalogSchema, FulfillmentChannel, Issue, Listing, Template};
use std::io::Write;

pub fn listing(row: usize, sku: &str, product_type: &str) -> Listing {
    Listing::new(row, sku, product_type)
}

pub fn channel_listing(row: usize, sku: &str, channel: FulfillmentChannel, name: &str) -> Listing {
    let mut listing = Listing::new(row, sku, "MUG");
    listing.fulfillment_channel = channel;
    listing.item_name = name.to_string();
    listing
}

pub fn strong_bullets() -> Vec<String> {
    [
        "Helps keep coffee hot for 6 hours with double-wall vacuum insulation",
        "Designed for commuters and travelers who want 1 leak-proof mug",
        "Unlike plastic tumblers, our 304 steel body is certified BPA-free",
    ]
    .iter()
    .map(|b| b.to_string())
    .collect()
}

pub fn weak_bullets() -> Vec<String> {
    ["Nice mug", "great for gifts.", "AMAZING QUALITY"]
        .iter()
        .map(|b| b.to_string())
        .collect()
}

pub fn sample_schema() -> CatalogSchema {
    let mut schema = CatalogSchema::default();
    schema.common.required = vec!["Title".to_string(), "Brand".to_string()];
    schema.product_types.insert(
        "MUG".to_string(),
        Template {
            required: vec!["Capacity".to_string()],
            conditional: vec!["Material".to_string()],
            optional: vec!["Color".to_string()],
        },
    );
    schema
}

/// Small catalog exercising most built-in queries
///
/// - `A-1` (FBA) and `A-1-FBM` (FBM) are channel duplicates
/// - `B-2` has a prohibited title character, weak bullets and no capacity
/// - `C-3` has a product type unrelated to its item type keyword
pub fn sample_export() -> CatalogExport {
    let mut a1 = channel_listing(2, "A-1", FulfillmentChannel::Fba, "Acme Travel Mug 12 oz");
    a1.title = "Acme Travel Mug 12 oz".to_string();
    a1.brand = "Acme".to_string();
    a1.item_type_keyword = "travel mugs".to_string();
    a1.bullet_points = strong_bullets();
    a1.attributes.insert("Capacity".to_string(), "12 oz".to_string());
    a1.attributes.insert("Material".to_string(), "Steel".to_string());

    let mut a1_fbm = a1.clone();
    a1_fbm.row_number = 3;
    a1_fbm.sku = "A-1-FBM".to_string();
    a1_fbm.fulfillment_channel = FulfillmentChannel::Fbm;

    let mut b2 = channel_listing(4, "B-2", FulfillmentChannel::Fba, "Acme Travel Mug 16 oz");
    b2.title = "Acme Travel Mug 16 oz!".to_string();
    b2.brand = "Acme".to_string();
    b2.bullet_points = weak_bullets();

    let mut c3 = listing(5, "C-3", "LAMP");
    c3.title = "Desk Lamp".to_string();
    c3.brand = "Lumo".to_string();
    c3.item_name = "Desk Lamp".to_string();
    c3.item_type_keyword = "garden hose".to_string();

    CatalogExport {
        listings: vec![a1, a1_fbm, b2, c3],
        schema: sample_schema(),
    }
}

/// Write an export to a temporary JSON file
pub fn write_export(export: &CatalogExport) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(export).unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

/// Query that always reports a failure
pub struct FailingQuery;

impl QueryPlugin for FailingQuery {
    fn name(&self) -> &str {
        "always-fails"
    }

    fn description(&self) -> &str {
        "Fails on every run"
    }

    fn evaluate(&self, _ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        Err(PluginError::Failed("rule data unavailable".to_string()))
    }
}

/// Query that panics during evaluation
pub struct PanickingQuery;

impl QueryPlugin for PanickingQuery {
    fn name(&self) -> &str {
        "always-panics"
    }

    fn description(&self) -> &str {
        "Panics on every run"
    }

    fn evaluate(&self, _ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        panic!("query exploded");
    }
}
