//! Variation candidate detection
//!
//! Standalone listings of the same brand whose names differ only by size,
//! count or color are likely members of one variation family that was never
//! linked. Variation children (child parentage or a parent SKU) are skipped.

use catalog_common::{Issue, Listing, Severity};
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::types::{PluginError, QueryContext, QueryPlugin};

const SIZE_PATTERN: &str =
    r"\b\d+(\.\d+)?\s*(fl\s*oz|oz|ml|l|lbs?|kg|g|count|ct|pack|pk|pcs|inch(es)?|in|cm|mm)\b";
const SIZE_WORD_PATTERN: &str = r"\b(x*small|medium|x*large|x{1,3}l|s|m|l)\b";
const COLOR_PATTERN: &str =
    r"\b(black|white|red|blue|green|yellow|pink|purple|orange|gr[ae]y|brown|silver|gold)\b";

/// Size, count and color token patterns, case-insensitive
static VARIATION_TOKENS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [SIZE_PATTERN, SIZE_WORD_PATTERN, COLOR_PATTERN]
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("valid variation pattern")
        })
        .collect()
});

pub struct MissingVariationsQuery;

impl QueryPlugin for MissingVariationsQuery {
    fn name(&self) -> &str {
        "missing-variations"
    }

    fn description(&self) -> &str {
        "Find products that might be missing variation relationships"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        // (brand, normalized name) -> listing indices
        let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
        for (idx, listing) in ctx.listings.iter().enumerate() {
            let (Some(brand), Some(name)) = (listing.field("Brand"), listing.field("Item Name"))
            else {
                continue;
            };
            if listing.is_variation_child() {
                continue;
            }
            let key = (brand.trim().to_lowercase(), normalize_family_name(name));
            if key.1.is_empty() {
                continue;
            }
            groups.entry(key).or_default().push(idx);
        }

        // listing index -> members of its candidate family
        let mut flagged: BTreeMap<usize, Vec<&Listing>> = BTreeMap::new();
        for indices in groups.values() {
            let members: Vec<&Listing> = indices.iter().map(|&i| &ctx.listings[i]).collect();
            let distinct_names: BTreeSet<&str> =
                members.iter().map(|l| l.item_name.trim()).collect();
            if distinct_names.len() < 2 {
                continue;
            }
            for &idx in indices {
                flagged.insert(idx, members.clone());
            }
        }

        let mut issues = Vec::new();
        for (idx, listing) in ctx.listings.iter().enumerate() {
            let Some(members) = flagged.get(&idx) else {
                continue;
            };
            let skus: Vec<&str> = members.iter().map(|m| m.sku.as_str()).collect();
            issues.push(Issue::for_listing(
                listing,
                "Variation",
                Severity::Info,
                format!(
                    "May be a variation candidate. Found {} similar products: {}",
                    members.len(),
                    skus.join(", ")
                ),
            ));
        }

        Ok(issues)
    }
}

/// Lowercase item name with size, count and color tokens removed
fn normalize_family_name(name: &str) -> String {
    let mut text = name.to_string();
    for pattern in VARIATION_TOKENS.iter() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::run;

    fn product(row: usize, sku: &str, brand: &str, name: &str) -> Listing {
        let mut listing = Listing::new(row, sku, "MUG");
        listing.brand = brand.to_string();
        listing.item_name = name.to_string();
        listing
    }

    #[test]
    fn test_normalize_strips_variation_tokens() {
        assert_eq!(normalize_family_name("Acme Travel Mug 12 oz - Black"), "acme travel mug");
        assert_eq!(normalize_family_name("Acme Travel Mug, 16oz, Large"), "acme travel mug");
        assert_eq!(normalize_family_name("Acme Travel Mug 2 Pack"), "acme travel mug");
    }

    #[test]
    fn test_size_variants_flagged_in_listing_order() {
        let listings = [
            product(1, "M-12", "Acme", "Travel Mug 12 oz"),
            product(2, "T-1", "Acme", "Teapot"),
            product(3, "M-16", "Acme", "Travel Mug 16 oz"),
        ];
        let issues = run(&MissingVariationsQuery, &listings);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].sku, "M-12");
        assert_eq!(issues[1].sku, "M-16");
        assert_eq!(
            issues[0].details,
            "May be a variation candidate. Found 2 similar products: M-12, M-16"
        );
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_identical_names_not_a_family() {
        let listings = [
            product(1, "A", "Acme", "Travel Mug"),
            product(2, "B", "Acme", "Travel Mug"),
        ];
        assert!(run(&MissingVariationsQuery, &listings).is_empty());
    }

    #[test]
    fn test_different_brands_not_grouped() {
        let listings = [
            product(1, "A", "Acme", "Travel Mug Red"),
            product(2, "B", "Zenith", "Travel Mug Blue"),
        ];
        assert!(run(&MissingVariationsQuery, &listings).is_empty());
    }

    #[test]
    fn test_children_and_blank_brand_skipped() {
        let mut child = product(1, "A", "Acme", "Travel Mug Red");
        child.parentage = "child".to_string();
        let mut linked = product(2, "B", "Acme", "Travel Mug Blue");
        linked.parent_sku = "P-1".to_string();
        let standalone = product(3, "C", "Acme", "Travel Mug Green");
        let no_brand = product(4, "D", "", "Travel Mug Pink");

        let issues = run(&MissingVariationsQuery, &[child, linked, standalone, no_brand]);
        assert!(issues.is_empty());
    }
}
