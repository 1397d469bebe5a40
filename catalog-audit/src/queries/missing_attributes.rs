//! Missing attribute queries
//!
//! Compare each listing against its product type's template. Templates are
//! resolved once per product type.

use catalog_common::{CatalogSchema, Issue, Severity, Template};
use std::collections::BTreeMap;

use crate::types::{PluginError, QueryContext, QueryPlugin};

/// Required attributes left blank
pub struct MissingAttributesQuery;

impl QueryPlugin for MissingAttributesQuery {
    fn name(&self) -> &str {
        "missing-attributes"
    }

    fn description(&self) -> &str {
        "Find mandatory (required) attributes missing from listings"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        Ok(find_missing(ctx, false))
    }
}

/// Required and conditionally-required attributes left blank
pub struct MissingAnyAttributesQuery;

impl QueryPlugin for MissingAnyAttributesQuery {
    fn name(&self) -> &str {
        "missing-any-attributes"
    }

    fn description(&self) -> &str {
        "Find all missing attributes (required and conditional)"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        Ok(find_missing(ctx, true))
    }
}

fn find_missing(ctx: &QueryContext<'_>, include_conditional: bool) -> Vec<Issue> {
    let mut templates = TemplateCache::new(ctx.schema);
    let mut issues = Vec::new();

    for listing in ctx.listings {
        let template = templates.get(&listing.product_type);

        for field in &template.required {
            if !listing.has_field(field) {
                issues.push(Issue::for_listing(
                    listing,
                    field.as_str(),
                    Severity::Required,
                    format!("Missing required field: {}", field),
                ));
            }
        }

        if include_conditional {
            for field in &template.conditional {
                if !listing.has_field(field) {
                    issues.push(Issue::for_listing(
                        listing,
                        field.as_str(),
                        Severity::Warning,
                        format!("Missing conditional field: {}", field),
                    ));
                }
            }
        }
    }

    issues
}

/// Effective templates keyed by product type
pub(crate) struct TemplateCache<'a> {
    schema: &'a CatalogSchema,
    templates: BTreeMap<String, Template>,
}

impl<'a> TemplateCache<'a> {
    pub(crate) fn new(schema: &'a CatalogSchema) -> Self {
        Self {
            schema,
            templates: BTreeMap::new(),
        }
    }

    pub(crate) fn get(&mut self, product_type: &str) -> &Template {
        let schema = self.schema;
        self.templates
            .entry(product_type.to_string())
            .or_insert_with(|| schema.template_for(product_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::run_with_schema;
    use catalog_common::Listing;

    fn schema() -> CatalogSchema {
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

    fn mug(row: usize, sku: &str) -> Listing {
        let mut listing = Listing::new(row, sku, "MUG");
        listing.title = "Coffee Mug".to_string();
        listing
    }

    #[test]
    fn test_required_fields_reported_in_template_order() {
        let listing = mug(2, "M-1");
        let issues = run_with_schema(&MissingAttributesQuery, &[listing], &schema());

        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["Brand", "Capacity"]);
        assert!(issues.iter().all(|i| i.severity == Severity::Required));
        assert_eq!(issues[0].details, "Missing required field: Brand");
        assert_eq!(issues[0].row, 2);
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut listing = mug(1, "M-1");
        listing.brand = "   ".to_string();
        listing.attributes.insert("Capacity".to_string(), "12 oz".to_string());
        let issues = run_with_schema(&MissingAttributesQuery, &[listing], &schema());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "Brand");
    }

    #[test]
    fn test_any_adds_conditional_as_warning() {
        let mut listing = mug(1, "M-1");
        listing.brand = "Acme".to_string();
        let issues = run_with_schema(&MissingAnyAttributesQuery, &[listing], &schema());

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "Capacity");
        assert_eq!(issues[0].severity, Severity::Required);
        assert_eq!(issues[1].field, "Material");
        assert_eq!(issues[1].severity, Severity::Warning);
        assert_eq!(issues[1].details, "Missing conditional field: Material");
    }

    #[test]
    fn test_unknown_product_type_uses_common_template() {
        let listing = Listing::new(1, "X-1", "LAMP");
        let issues = run_with_schema(&MissingAnyAttributesQuery, &[listing], &schema());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["Title", "Brand"]);
    }
}
