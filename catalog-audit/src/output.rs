//! Terminal, JSON and CSV rendering
//!
//! Rendering returns strings; the binary decides where they go. Terminal
//! output lists at most [`MAX_TERMINAL_ISSUES`] issues per query. CSV has one
//! row per issue and always goes to a file.

use catalog_common::Severity;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::aggregator::CatalogSummary;
use crate::report::{CatalogReport, REPORT_SCHEMA_VERSION};
use crate::types::{QueryInfo, QueryResult};

/// Issues shown per query in terminal output
pub const MAX_TERMINAL_ISSUES: usize = 20;

/// CSV header, one column per issue field plus the query name
pub const CSV_COLUMNS: [&str; 7] = ["query", "row", "sku", "field", "severity", "details", "product_type"];

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Csv,
}

/// Plain-text formatter for terminal output
pub struct TerminalFormatter;

impl TerminalFormatter {
    /// Registered queries, one per line
    pub fn format_query_list(queries: &[QueryInfo]) -> String {
        let width = queries.iter().map(|q| q.name.len()).max().unwrap_or(0);
        let mut out = String::from("Available queries:\n");
        for query in queries {
            let _ = writeln!(out, "  {:<width$}  {}", query.name, query.description, width = width);
        }
        out
    }

    /// One query's header and, optionally, its first issues
    ///
    /// Example: `[✓] long-titles: 3 issues across 2 SKUs`
    pub fn format_query_result(result: &QueryResult, show_details: bool) -> String {
        let mut out = String::new();

        if let Some(error) = result.error() {
            let _ = writeln!(out, "[✗] {}: FAILED ({})", result.query_name, error);
            return out;
        }

        let symbol = if result.issues.is_empty() { "✓" } else { "⚠" };
        let _ = writeln!(
            out,
            "[{}] {}: {} issues across {} SKUs",
            symbol,
            result.query_name,
            result.total_issues(),
            result.affected_skus()
        );

        if show_details {
            for issue in result.issues.iter().take(MAX_TERMINAL_ISSUES) {
                let _ = writeln!(
                    out,
                    "    row {:>5}  {:<20} {:<8} {}: {}",
                    issue.row,
                    issue.sku,
                    issue.severity.as_str(),
                    issue.field,
                    issue.details
                );
            }
            let hidden = result.total_issues().saturating_sub(MAX_TERMINAL_ISSUES);
            if hidden > 0 {
                let _ = writeln!(out, "    ... and {} more", hidden);
            }
        }

        out
    }

    /// Catalog totals, tier distribution and suppressed duplicates
    pub fn format_summary(summary: &CatalogSummary) -> String {
        let tiers = &summary.tiers;
        let mut out = String::from("\n=== Catalog Summary ===\n");
        let _ = writeln!(out, "Listings audited:      {}", summary.total_listings);
        let _ = writeln!(out, "Duplicates suppressed: {}", summary.suppressed_duplicates);
        let _ = writeln!(
            out,
            "Queries run:           {} ({} failed)",
            summary.total_queries, summary.failed_queries
        );
        let _ = writeln!(out, "Total issues:          {}", summary.total_issues);
        let _ = writeln!(out, "Affected SKUs:         {}", summary.total_affected_skus);
        let _ = writeln!(
            out,
            "Bullet tiers:          Good {} | Fair {} | Weak {} | Critical {} | Unscored {}",
            tiers.good, tiers.fair, tiers.weak, tiers.critical, tiers.unscored
        );
        out
    }

    /// Full terminal rendering of a scan
    pub fn format_scan(
        results: &[QueryResult],
        summary: &CatalogSummary,
        show_details: bool,
    ) -> String {
        let mut out = String::new();
        for result in results {
            out.push_str(&Self::format_query_result(result, show_details));
        }
        out.push_str(&Self::format_summary(summary));
        out
    }
}

/// Pretty-printed JSON report
pub fn render_json(report: &CatalogReport) -> serde_json::Result<String> {
    debug!(schema_version = REPORT_SCHEMA_VERSION, "Rendering JSON report");
    report.to_json_pretty()
}

#[derive(Serialize)]
struct CsvRow<'a> {
    query: &'a str,
    row: usize,
    sku: &'a str,
    field: &'a str,
    severity: Severity,
    details: &'a str,
    product_type: &'a str,
}

/// Every issue of every query as CSV, header first
pub fn render_csv(results: &[QueryResult]) -> csv::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;

    for result in results {
        for issue in &result.issues {
            writer.serialize(CsvRow {
                query: &result.query_name,
                row: issue.row,
                sku: &issue.sku,
                field: &issue.field,
                severity: issue.severity,
                details: &issue.details,
                product_type: &issue.product_type,
            })?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// File a CSV report lands in when no `--output` is given
///
/// `<query>_results.csv` for a single query, `catalog_scan_results.csv` for a
/// full scan.
pub fn default_csv_path(query: Option<&str>) -> PathBuf {
    match query {
        Some(name) => PathBuf::from(format!("{}_results.csv", name)),
        None => PathBuf::from("catalog_scan_results.csv"),
    }
}

/// Write rendered output to a file, or stdout when no path is given
pub fn emit(content: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::TierDistribution;
    use crate::types::{PluginError, QueryContext, QueryPlugin, QueryStatus};
    use catalog_common::{Issue, Listing, Severity};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn result_with(count: usize) -> QueryResult {
        QueryResult {
            query_name: "long-titles".to_string(),
            description: "Find long titles".to_string(),
            issues: (0..count)
                .map(|i| {
                    let listing = Listing::new(i + 1, format!("SKU-{}", i % 3), "PT");
                    Issue::for_listing(&listing, "Title", Severity::Warning, "too long")
                })
                .collect(),
            status: QueryStatus::Completed,
            sku_scores: BTreeMap::new(),
        }
    }

    #[test]
    fn test_header_counts_issues_and_skus() {
        let text = TerminalFormatter::format_query_result(&result_with(5), false);
        assert_eq!(text, "[⚠] long-titles: 5 issues across 3 SKUs\n");
    }

    #[test]
    fn test_details_capped() {
        let text = TerminalFormatter::format_query_result(&result_with(25), true);
        assert_eq!(text.matches("too long").count(), MAX_TERMINAL_ISSUES);
        assert!(text.contains("... and 5 more"));
    }

    struct Failing;

    impl QueryPlugin for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "Fails"
        }
        fn evaluate(&self, _ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
            Err(PluginError::Failed("nope".to_string()))
        }
    }

    #[test]
    fn test_failed_query_rendered() {
        let failed = QueryResult::failed(&Failing, &PluginError::Failed("nope".to_string()));
        let text = TerminalFormatter::format_query_result(&failed, true);
        assert_eq!(text, "[✗] failing: FAILED (nope)\n");
    }

    #[test]
    fn test_summary_lists_tiers() {
        let summary = CatalogSummary {
            timestamp: Utc::now(),
            total_listings: 4,
            suppressed_duplicates: 1,
            total_queries: 11,
            failed_queries: 0,
            total_issues: 9,
            total_affected_skus: 3,
            tiers: TierDistribution {
                good: 1,
                fair: 1,
                weak: 1,
                critical: 0,
                unscored: 1,
            },
        };
        let text = TerminalFormatter::format_summary(&summary);
        assert!(text.contains("Duplicates suppressed: 1"));
        assert!(text.contains("Good 1 | Fair 1 | Weak 1 | Critical 0 | Unscored 1"));
    }

    #[test]
    fn test_csv_rows_per_issue() {
        let mut result = result_with(2);
        result.issues[1].details = "has, a comma".to_string();
        let csv = render_csv(&[result]).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "query,row,sku,field,severity,details,product_type");
        assert_eq!(lines[1], "long-titles,1,SKU-0,Title,warning,too long,PT");
        assert_eq!(lines[2], "long-titles,2,SKU-1,Title,warning,\"has, a comma\",PT");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_header_only_without_issues() {
        let csv = render_csv(&[result_with(0)]).unwrap();
        assert_eq!(csv, "query,row,sku,field,severity,details,product_type\n");
    }

    #[test]
    fn test_default_csv_paths() {
        assert_eq!(
            default_csv_path(Some("long-titles")),
            PathBuf::from("long-titles_results.csv")
        );
        assert_eq!(default_csv_path(None), PathBuf::from("catalog_scan_results.csv"));
    }

    #[test]
    fn test_query_list_aligned() {
        let text = TerminalFormatter::format_query_list(&[
            QueryInfo {
                name: "a".to_string(),
                description: "first".to_string(),
            },
            QueryInfo {
                name: "long-name".to_string(),
                description: "second".to_string(),
            },
        ]);
        assert!(text.contains("  a          first\n"));
        assert!(text.contains("  long-name  second\n"));
    }
}
