//! Attribute schema per product type
//!
//! Category templates declare which columns a product type must fill
//! (required), must fill under some conditions (conditional), and may fill
//! (optional). The `common` template applies to every product type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute template for one product type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub required: Vec<String>,
    pub conditional: Vec<String>,
    pub optional: Vec<String>,
}

impl Template {
    /// Every attribute the template defines, in declaration order, without repeats
    pub fn all_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        for field in self
            .required
            .iter()
            .chain(&self.conditional)
            .chain(&self.optional)
        {
            push_unique(&mut fields, field);
        }
        fields
    }

    /// Merge another template into this one, keeping first occurrences
    ///
    /// An attribute required by either side stays required and is dropped
    /// from the conditional list.
    fn merge(&mut self, other: &Template) {
        for field in &other.required {
            push_unique(&mut self.required, field);
        }
        for field in &other.conditional {
            push_unique(&mut self.conditional, field);
        }
        for field in &other.optional {
            push_unique(&mut self.optional, field);
        }
        let required = self.required.clone();
        self.conditional.retain(|f| !required.contains(f));
        let conditional = self.conditional.clone();
        self.optional
            .retain(|f| !required.contains(f) && !conditional.contains(f));
    }
}

/// Attribute schema for a whole catalog export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSchema {
    /// Template shared by every product type
    pub common: Template,
    /// Product-type specific templates, keyed by product type
    pub product_types: BTreeMap<String, Template>,
}

impl CatalogSchema {
    /// Effective template for a product type (common merged with specific)
    pub fn template_for(&self, product_type: &str) -> Template {
        let mut template = Template::default();
        template.merge(&self.common);
        if let Some(specific) = self.product_types.get(product_type.trim()) {
            template.merge(specific);
        }
        template
    }
}

fn push_unique(fields: &mut Vec<String>, field: &str) {
    if !fields.iter().any(|f| f == field) {
        fields.push(field.to_string());
    }
}
