//! Unused template attributes
//!
//! For each product type present, find template attributes that no listing
//! anywhere in the catalog fills. Columns in `always_unused` are expected to
//! stay blank and are never reported. One summary issue per product type,
//! anchored to the first listing of that type so it carries a real SKU and
//! row.

use catalog_common::{Issue, Listing, Severity};
use std::collections::BTreeSet;

use super::missing_attributes::TemplateCache;
use crate::types::{PluginError, QueryContext, QueryPlugin};

pub struct NewAttributesQuery;

impl QueryPlugin for NewAttributesQuery {
    fn name(&self) -> &str {
        "new-attributes"
    }

    fn description(&self) -> &str {
        "Find template attributes that aren't being used in any listings"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        let used: BTreeSet<String> = ctx
            .listings
            .iter()
            .flat_map(Listing::populated_fields)
            .collect();

        // product type -> first listing, in catalog order
        let mut anchors: Vec<(&str, &Listing)> = Vec::new();
        for listing in ctx.listings {
            if !anchors.iter().any(|(pt, _)| *pt == listing.product_type) {
                anchors.push((listing.product_type.as_str(), listing));
            }
        }

        let mut templates = TemplateCache::new(ctx.schema);
        let mut issues = Vec::new();

        for (product_type, anchor) in anchors {
            let unused: BTreeSet<String> = templates
                .get(product_type)
                .all_fields()
                .into_iter()
                .filter(|f| !used.contains(f))
                .filter(|f| !ctx.rules.always_unused.contains(f))
                .collect();

            if unused.is_empty() {
                continue;
            }

            let names: Vec<&str> = unused.iter().map(String::as_str).collect();
            issues.push(Issue::for_listing(
                anchor,
                "Template Fields",
                Severity::Info,
                format!(
                    "Found {} unused template fields that might be valuable: {}",
                    unused.len(),
                    names.join(", ")
                ),
            ));
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::run_with_schema;
    use catalog_common::{CatalogSchema, Template};

    fn schema() -> CatalogSchema {
        let mut schema = CatalogSchema::default();
        schema.common.required = vec!["Title".to_string()];
        schema.product_types.insert(
            "MUG".to_string(),
            Template {
                required: vec![],
                conditional: vec!["Material".to_string()],
                optional: vec![
                    "Color".to_string(),
                    "Status".to_string(),
                    "Capacity".to_string(),
                ],
            },
        );
        schema
    }

    #[test]
    fn test_one_issue_per_product_type_anchored_to_first_listing() {
        let mut first = Listing::new(3, "M-1", "MUG");
        first.title = "Mug".to_string();
        let mut second = Listing::new(4, "M-2", "MUG");
        second.attributes.insert("Color".to_string(), "Red".to_string());
        let lamp = Listing::new(5, "L-1", "LAMP");

        let issues = run_with_schema(&NewAttributesQuery, &[first, second, lamp], &schema());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].sku, "M-1");
        assert_eq!(issues[0].row, 3);
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(
            issues[0].details,
            "Found 2 unused template fields that might be valuable: Capacity, Material"
        );
    }

    #[test]
    fn test_field_used_by_another_product_type_counts_as_used() {
        let mut mug = Listing::new(1, "M-1", "MUG");
        mug.title = "Mug".to_string();
        let lamp = Listing::new(2, "L-1", "LAMP");

        let mut schema = CatalogSchema::default();
        schema.common.required = vec!["Title".to_string()];

        assert!(run_with_schema(&NewAttributesQuery, &[mug, lamp], &schema).is_empty());
    }

    #[test]
    fn test_type_specific_field_unused_everywhere_is_reported() {
        let mut mug = Listing::new(1, "M-1", "MUG");
        mug.title = "Mug".to_string();
        let mut lamp = Listing::new(2, "L-1", "LAMP");
        lamp.attributes.insert("Material".to_string(), "Brass".to_string());

        let issues = run_with_schema(&NewAttributesQuery, &[mug, lamp], &schema());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].sku, "M-1");
        assert_eq!(
            issues[0].details,
            "Found 2 unused template fields that might be valuable: Capacity, Color"
        );
    }

    #[test]
    fn test_fully_used_template_yields_nothing() {
        let mut listing = Listing::new(1, "M-1", "MUG");
        listing.title = "Mug".to_string();
        for field in ["Material", "Color", "Capacity"] {
            listing.attributes.insert(field.to_string(), "x".to_string());
        }
        assert!(run_with_schema(&NewAttributesQuery, &[listing], &schema()).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(run_with_schema(&NewAttributesQuery, &[], &schema()).is_empty());
    }
}
