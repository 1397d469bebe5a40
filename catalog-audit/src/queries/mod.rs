//! Built-in catalog queries
//!
//! # Queries (registration order)
//! 1. **missing-attributes** - required template attributes left blank
//! 2. **missing-any-attributes** - required and conditional attributes left blank
//! 3. **new-attributes** - template attributes no listing of a product type uses
//! 4. **rufus-bullets** - bullet content scored below the RUFUS threshold
//! 5. **long-titles** - titles over the length limit
//! 6. **title-prohibited-chars** - prohibited characters in titles
//! 7. **prohibited-chars** - prohibited characters in Title, Item Name, Brand
//! 8. **product-type-mismatch** - product type unrelated to item type keyword
//! 9. **missing-variations** - standalone listings that look like one family
//! 10. **bullet-prohibited-content** - special chars, emoji, placeholders, claims
//! 11. **bullet-formatting** - capitalization, length, punctuation, bullet count

pub mod bullet_validation;
pub mod char_validation;
pub mod missing_attributes;
pub mod new_attributes;
pub mod product_type_check;
pub mod rufus_bullets;
pub mod title_checks;
pub mod variation_check;

pub use bullet_validation::{BulletFormattingQuery, BulletProhibitedContentQuery};
pub use char_validation::ProhibitedCharsQuery;
pub use missing_attributes::{MissingAnyAttributesQuery, MissingAttributesQuery};
pub use new_attributes::NewAttributesQuery;
pub use product_type_check::ProductTypeMismatchQuery;
pub use rufus_bullets::{RufusBulletsQuery, RUFUS_QUERY_NAME};
pub use title_checks::{LongTitlesQuery, TitleProhibitedCharsQuery};
pub use variation_check::MissingVariationsQuery;

use crate::types::QueryPlugin;
use std::sync::Arc;

/// Maximum characters of listing text quoted in issue details
pub const EXCERPT_CHARS: usize = 100;

/// Every built-in query, in registration order
pub fn builtin_queries() -> Vec<Arc<dyn QueryPlugin>> {
    vec![
        Arc::new(MissingAttributesQuery),
        Arc::new(MissingAnyAttributesQuery),
        Arc::new(NewAttributesQuery),
        Arc::new(RufusBulletsQuery::new()),
        Arc::new(LongTitlesQuery),
        Arc::new(TitleProhibitedCharsQuery),
        Arc::new(ProhibitedCharsQuery),
        Arc::new(ProductTypeMismatchQuery),
        Arc::new(MissingVariationsQuery),
        Arc::new(BulletProhibitedContentQuery),
        Arc::new(BulletFormattingQuery),
    ]
}

/// First `EXCERPT_CHARS` characters of `text`, with "..." when cut
pub(crate) fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut)
    }
}
