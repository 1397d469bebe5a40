//! Title validation queries

use catalog_common::rules::{find_chars, join_chars};
use catalog_common::{Issue, Severity};

use super::excerpt;
use crate::types::{PluginError, QueryContext, QueryPlugin};

/// Titles longer than `rules.max_title_length` characters
pub struct LongTitlesQuery;

impl QueryPlugin for LongTitlesQuery {
    fn name(&self) -> &str {
        "long-titles"
    }

    fn description(&self) -> &str {
        "Find titles longer than the configured maximum length"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        let max = ctx.rules.max_title_length;

        Ok(ctx
            .listings
            .iter()
            .filter_map(|listing| {
                let title = listing.field("Title")?;
                let length = title.chars().count();
                (length > max).then(|| {
                    Issue::for_listing(
                        listing,
                        "Title",
                        Severity::Warning,
                        format!(
                            "Title length {} exceeds {} characters: {}",
                            length,
                            max,
                            excerpt(title)
                        ),
                    )
                })
            })
            .collect())
    }
}

/// Titles containing a character of `rules.title_prohibited_chars`
pub struct TitleProhibitedCharsQuery;

impl QueryPlugin for TitleProhibitedCharsQuery {
    fn name(&self) -> &str {
        "title-prohibited-chars"
    }

    fn description(&self) -> &str {
        "Find titles containing prohibited characters"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        Ok(ctx
            .listings
            .iter()
            .filter_map(|listing| {
                let title = listing.field("Title")?;
                let found = find_chars(title, &ctx.rules.title_prohibited_chars);
                (!found.is_empty()).then(|| {
                    Issue::for_listing(
                        listing,
                        "Title",
                        Severity::Warning,
                        format!("Title contains prohibited characters: {}", join_chars(&found)),
                    )
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::run;
    use catalog_common::{CatalogSchema, Listing, RuleSet};

    fn titled(row: usize, sku: &str, title: &str) -> Listing {
        let mut listing = Listing::new(row, sku, "PT");
        listing.title = title.to_string();
        listing
    }

    #[test]
    fn test_long_title_boundary() {
        let at_limit = titled(1, "A", &"a".repeat(200));
        let over = titled(2, "B", &"b".repeat(201));
        let issues = run(&LongTitlesQuery, &[at_limit, over]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].sku, "B");
        assert!(issues[0]
            .details
            .starts_with("Title length 201 exceeds 200 characters: "));
        assert!(issues[0].details.ends_with("..."));
    }

    #[test]
    fn test_long_title_counts_characters_not_bytes() {
        let accented = titled(1, "A", &"é".repeat(150));
        assert!(run(&LongTitlesQuery, &[accented]).is_empty());
    }

    #[test]
    fn test_title_prohibited_chars_sorted() {
        let listing = titled(1, "A", "Great Mug! Only $9? {sale}");
        let issues = run(&TitleProhibitedCharsQuery, &[listing]);

        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].details,
            "Title contains prohibited characters: !, $, ?, {, }"
        );
    }

    #[test]
    fn test_angle_brackets_allowed_in_titles() {
        let listing = titled(1, "A", "Mug <Blue>");
        assert!(run(&TitleProhibitedCharsQuery, &[listing]).is_empty());
    }

    #[test]
    fn test_configured_limits_apply() {
        let rules = RuleSet {
            max_title_length: 10,
            title_prohibited_chars: "#".to_string(),
            ..RuleSet::default()
        };
        let schema = CatalogSchema::default();
        let listings = [titled(1, "A", "Mug #1 with lid!")];
        let ctx = QueryContext::new(&listings, &schema, &rules);

        let long = LongTitlesQuery.evaluate(&ctx).unwrap();
        assert!(long[0].details.starts_with("Title length 16 exceeds 10 characters"));
        let chars = TitleProhibitedCharsQuery.evaluate(&ctx).unwrap();
        assert_eq!(chars[0].details, "Title contains prohibited characters: #");

        assert!(!LongTitlesQuery.description().contains("200"));
        assert!(!TitleProhibitedCharsQuery.description().contains('!'));
    }

    #[test]
    fn test_blank_title_skipped() {
        assert!(run(&TitleProhibitedCharsQuery, &[titled(1, "A", "")]).is_empty());
        assert!(run(&LongTitlesQuery, &[titled(1, "A", "  ")]).is_empty());
    }
}
