//! # Catalog Common Library
//!
//! Shared code for the catalog audit tools including:
//! - Listing records and fulfillment channels
//! - Issue and severity types produced by audit queries
//! - Attribute schema (per product type templates)
//! - Rule configuration (prohibited characters, phrases, thresholds)
//! - Catalog export loading and TOML configuration

pub mod config;
pub mod error;
pub mod export;
pub mod issue;
pub mod listing;
pub mod rules;
pub mod schema;

pub use error::{Error, Result};
pub use export::CatalogExport;
pub use issue::{Issue, Severity};
pub use listing::{FulfillmentChannel, Listing};
pub use rules::RuleSet;
pub use schema::{CatalogSchema, Template};
