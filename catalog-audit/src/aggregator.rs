//! Result aggregation
//!
//! Combines per-query results into catalog-level figures:
//! - total issues (sum over queries)
//! - affected SKUs (distinct over all queries, never summed)
//! - per-SKU bullet scores and their tier distribution
//!
//! Only the score-producing query (`rufus-bullets` by default) feeds the
//! tiers. Filtered listings without a score are counted as `unscored`,
//! never folded into a tier.

use catalog_common::Listing;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::engine::AuditRun;
use crate::queries::RUFUS_QUERY_NAME;
use crate::report::{CatalogReport, QueryReport};
use crate::scoring::Tier;
use crate::types::QueryResult;

/// Bullet score of one SKU
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkuScore {
    pub sku: String,
    pub rufus_score: f64,
    pub tier: Tier,
}

/// Count of SKUs per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierDistribution {
    pub good: usize,
    pub fair: usize,
    pub weak: usize,
    pub critical: usize,
    /// Filtered listings without a score
    pub unscored: usize,
}

impl TierDistribution {
    fn add(&mut self, tier: Tier) {
        match tier {
            Tier::Good => self.good += 1,
            Tier::Fair => self.fair += 1,
            Tier::Weak => self.weak += 1,
            Tier::Critical => self.critical += 1,
        }
    }

    pub fn scored(&self) -> usize {
        self.good + self.fair + self.weak + self.critical
    }
}

/// Catalog-level summary of a scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub timestamp: DateTime<Utc>,
    /// Listings audited (after duplicate filtering)
    pub total_listings: usize,
    pub suppressed_duplicates: usize,
    pub total_queries: usize,
    pub failed_queries: usize,
    pub total_issues: usize,
    pub total_affected_skus: usize,
    pub tiers: TierDistribution,
}

/// Builds summaries and reports from query results
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    score_query: String,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self {
            score_query: RUFUS_QUERY_NAME.to_string(),
        }
    }
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_issues(&self, results: &[QueryResult]) -> usize {
        results.iter().map(QueryResult::total_issues).sum()
    }

    /// Distinct SKUs across every query's issues
    pub fn total_affected_skus(&self, results: &[QueryResult]) -> usize {
        results
            .iter()
            .flat_map(|r| r.issues.iter().map(|i| i.sku.as_str()))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Per-SKU scores from the score query, sorted by SKU
    ///
    /// Empty when the score query is absent or failed.
    pub fn sku_scores(&self, results: &[QueryResult]) -> Vec<SkuScore> {
        results
            .iter()
            .find(|r| r.query_name == self.score_query)
            .map(|r| {
                r.sku_scores
                    .iter()
                    .map(|(sku, &score)| SkuScore {
                        sku: sku.clone(),
                        rufus_score: score,
                        tier: Tier::from_score(score),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tier counts over scored SKUs, plus unscored filtered listings
    pub fn tier_distribution(
        &self,
        results: &[QueryResult],
        filtered_listings: &[Listing],
    ) -> TierDistribution {
        let scores = self.sku_scores(results);
        let mut tiers = TierDistribution::default();
        for score in &scores {
            tiers.add(score.tier);
        }

        let scored: BTreeSet<&str> = scores.iter().map(|s| s.sku.as_str()).collect();
        tiers.unscored = filtered_listings
            .iter()
            .map(|l| l.sku.as_str())
            .collect::<BTreeSet<_>>()
            .difference(&scored)
            .count();
        tiers
    }

    pub fn summarize(&self, run: &AuditRun, timestamp: DateTime<Utc>) -> CatalogSummary {
        CatalogSummary {
            timestamp,
            total_listings: run.filtered_listings.len(),
            suppressed_duplicates: run.suppressed_count(),
            total_queries: run.results.len(),
            failed_queries: run.failed_queries(),
            total_issues: self.total_issues(&run.results),
            total_affected_skus: self.total_affected_skus(&run.results),
            tiers: self.tier_distribution(&run.results, &run.filtered_listings),
        }
    }

    /// Report in the stable JSON layout
    pub fn build_report(&self, results: &[QueryResult], timestamp: DateTime<Utc>) -> CatalogReport {
        CatalogReport {
            timestamp,
            total_queries: results.len(),
            total_issues: self.total_issues(results),
            total_affected_skus: self.total_affected_skus(results),
            queries: results.iter().map(QueryReport::from).collect(),
        }
    }
}
