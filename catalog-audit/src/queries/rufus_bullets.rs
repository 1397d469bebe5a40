//! RUFUS bullet optimization query
//!
//! Scores every listing's bullets with [`BulletScorer`] and reports those
//! below `rules.rufus_threshold`. All scores are exported for tiering.

use catalog_common::{Issue, Severity};
use std::collections::BTreeMap;
use tracing::debug;

use crate::scoring::BulletScorer;
use crate::types::{PluginError, QueryContext, QueryPlugin};

/// Name the aggregator reads scores from
pub const RUFUS_QUERY_NAME: &str = "rufus-bullets";

#[derive(Debug, Clone, Default)]
pub struct RufusBulletsQuery {
    scorer: BulletScorer,
}

impl RufusBulletsQuery {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryPlugin for RufusBulletsQuery {
    fn name(&self) -> &str {
        RUFUS_QUERY_NAME
    }

    fn description(&self) -> &str {
        "Score bullet points against the RUFUS rubric (benefit, audience, differentiation, specifics)"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        let threshold = ctx.rules.rufus_threshold;
        let mut issues = Vec::new();

        for listing in ctx.listings {
            let result = self.scorer.score(listing);
            if result.score >= threshold {
                continue;
            }

            let problems: Vec<&str> = result.violations.iter().map(|d| d.label()).collect();
            issues.push(Issue::for_listing(
                listing,
                "Bullet Points",
                Severity::Warning,
                format!(
                    "Bullets score {:.2}/5: {}. Suggestions: {}",
                    result.score,
                    problems.join("; "),
                    result.suggestions.join(" | ")
                ),
            ));
        }

        debug!(
            listings = ctx.listings.len(),
            below_threshold = issues.len(),
            threshold,
            "Scored bullets"
        );
        Ok(issues)
    }

    fn sku_scores(&self, ctx: &QueryContext<'_>) -> Option<BTreeMap<String, f64>> {
        Some(
            ctx.listings
                .iter()
                .map(|listing| (listing.sku.clone(), self.scorer.score(listing).score))
                .collect(),
        )
    }
}
