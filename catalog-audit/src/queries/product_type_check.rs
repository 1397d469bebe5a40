//! Product type / item type keyword consistency
//!
//! A listing is flagged when its product type (underscores read as spaces)
//! shares no word with the item type keyword and is not contained in it.
//! Words are compared after folding a trailing plural `s`, so `MUG` and
//! `coffee mugs` agree.

use catalog_common::{Issue, Severity};
use std::collections::BTreeSet;

use crate::types::{PluginError, QueryContext, QueryPlugin};

const KEYWORD_EXCERPT_CHARS: usize = 60;

pub struct ProductTypeMismatchQuery;

impl QueryPlugin for ProductTypeMismatchQuery {
    fn name(&self) -> &str {
        "product-type-mismatch"
    }

    fn description(&self) -> &str {
        "Find potential mismatches between product type and item type keyword"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        let mut issues = Vec::new();

        for listing in ctx.listings {
            let (Some(product_type), Some(keyword)) =
                (listing.field("Product Type"), listing.field("Item Type Keyword"))
            else {
                continue;
            };

            if is_consistent(product_type, keyword) {
                continue;
            }

            let shown: String = keyword.chars().take(KEYWORD_EXCERPT_CHARS).collect();
            issues.push(Issue::for_listing(
                listing,
                "Product Type / Item Type Keyword",
                Severity::Warning,
                format!(
                    "Product type '{}' may not match item type keyword '{}'",
                    product_type, shown
                ),
            ));
        }

        Ok(issues)
    }
}

fn is_consistent(product_type: &str, keyword: &str) -> bool {
    let pt = product_type.to_lowercase().replace('_', " ");
    let kw = keyword.to_lowercase();

    if kw.contains(pt.trim()) {
        return true;
    }
    let pt_words = folded_words(&pt);
    let kw_words = folded_words(&kw);
    !pt_words.is_disjoint(&kw_words)
}

fn folded_words(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(singular)
        .collect()
}

/// Naive singular form: drop one trailing `s` (not `ss`) from longer words
fn singular(word: &str) -> String {
    match word.strip_suffix('s') {
        Some(stem) if word.len() > 3 && !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}
