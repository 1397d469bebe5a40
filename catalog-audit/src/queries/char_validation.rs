//! Prohibited characters in general listing fields
//!
//! Only Title, Item Name and Brand are checked. Bullets have their own,
//! stricter query and descriptions follow different content rules.

use catalog_common::rules::{find_chars, join_chars};
use catalog_common::{Issue, Severity};

use crate::types::{PluginError, QueryContext, QueryPlugin};

/// Columns checked, in reporting order
pub const CHECKED_FIELDS: [&str; 3] = ["Title", "Item Name", "Brand"];

pub struct ProhibitedCharsQuery;

impl QueryPlugin for ProhibitedCharsQuery {
    fn name(&self) -> &str {
        "prohibited-chars"
    }

    fn description(&self) -> &str {
        "Find listings with basic prohibited characters in title/brand"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        let mut issues = Vec::new();

        for listing in ctx.listings {
            for field in CHECKED_FIELDS {
                let Some(value) = listing.field(field) else {
                    continue;
                };
                let found = find_chars(value, &ctx.rules.prohibited_chars);
                if found.is_empty() {
                    continue;
                }
                issues.push(Issue::for_listing(
                    listing,
                    field,
                    Severity::Warning,
                    format!(
                        "Field '{}' contains prohibited characters: {}",
                        field,
                        join_chars(&found)
                    ),
                ));
            }
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::run;
    use catalog_common::Listing;

    #[test]
    fn test_only_general_fields_checked() {
        let mut listing = Listing::new(1, "A-1", "PT");
        listing.title = "Clean title".to_string();
        listing.bullet_points = vec!["Bullet with <angle> and $".to_string()];
        listing
            .attributes
            .insert("Product Description".to_string(), "Save $$$!".to_string());

        assert!(run(&ProhibitedCharsQuery, &[listing]).is_empty());
    }

    #[test]
    fn test_fields_reported_in_fixed_order() {
        let mut listing = Listing::new(7, "A-1", "PT");
        listing.brand = "Acme<>".to_string();
        listing.title = "Mug!".to_string();
        listing.item_name = "Mug_1".to_string();

        let issues = run(&ProhibitedCharsQuery, &[listing]);
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["Title", "Item Name", "Brand"]);
        assert_eq!(
            issues[2].details,
            "Field 'Brand' contains prohibited characters: <, >"
        );
        assert!(issues.iter().all(|i| i.row == 7));
    }
}
