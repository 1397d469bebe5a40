//! catalog - Catalog export audit CLI
//!
//! Runs the audit query engine over a catalog export and prints findings to
//! stdout. Logs go to stderr.
//!
//! ```bash
//! catalog list-queries
//! catalog check long-titles export.json --format json
//! catalog scan export.json --show-details --concurrent
//! catalog scan export.json --format csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use catalog_audit::buildinfo::{BuildInfo, LONG_VERSION, VERSION};
use catalog_audit::output::{
    default_csv_path, emit, render_csv, render_json, OutputFormat, TerminalFormatter,
};
use catalog_audit::{AuditError, QueryEngine, QueryEngineBuilder, QueryResult, ResultAggregator};
use catalog_common::config::{AuditConfig, ConfigResolver, ConfigSource};
use catalog_common::CatalogExport;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for catalog
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Audit a catalog export for data-quality issues")]
#[command(version = VERSION, long_version = LONG_VERSION)]
struct Cli {
    /// Configuration file (overrides CATALOG_AUDIT_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available queries
    ListQueries,

    /// Run a single query
    Check {
        /// Query name (see list-queries)
        query: String,

        /// Catalog export file (JSON)
        export: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,

        /// Write output to a file instead of stdout (CSV defaults to <QUERY>_results.csv)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Only print the issue counts
        #[arg(long)]
        no_details: bool,
    },

    /// Run every query and summarize the catalog
    Scan {
        /// Catalog export file (JSON)
        export: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,

        /// Write output to a file instead of stdout (CSV defaults to catalog_scan_results.csv)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Print issues under each query
        #[arg(long)]
        show_details: bool,

        /// Audit FBM/MFN shadow listings too
        #[arg(long)]
        include_fbm_duplicates: bool,

        /// Run queries in parallel
        #[arg(long)]
        concurrent: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config is read before logging exists; its source is logged below
    let (mut config, source) = ConfigResolver::new(cli.config.clone())
        .load_with_source()
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("catalog {}", BuildInfo::current());
    match &source {
        ConfigSource::Defaults => warn!("No config file found, using built-in defaults"),
        _ => info!(source = ?source, "Configuration loaded"),
    }

    match cli.command {
        Command::ListQueries => {
            let engine = QueryEngine::builder().with_builtin_queries()?.build();
            emit(&TerminalFormatter::format_query_list(&engine.list_queries()), None)?;
        }
        Command::Check {
            query,
            export,
            format,
            output,
            no_details,
        } => {
            let export = load_export(&export, &config)?;
            let engine = build_engine(&config, &export)?;

            let result = match engine.run_one(&query, &export.listings) {
                Ok(result) => result,
                Err(AuditError::QueryNotFound(name)) => {
                    eprintln!("Error: Unknown query '{}'", name);
                    eprintln!("Run 'catalog list-queries' to see available queries");
                    std::process::exit(1);
                }
                Err(e) => {
                    return Err(anyhow::Error::new(e).context(format!("Query '{}' failed", query)))
                }
            };

            let content = match format {
                OutputFormat::Terminal => TerminalFormatter::format_query_result(&result, !no_details),
                OutputFormat::Json => {
                    let report = ResultAggregator::new().build_report(&[result], Utc::now());
                    render_json(&report)?
                }
                OutputFormat::Csv => {
                    let path = output.unwrap_or_else(|| default_csv_path(Some(&query)));
                    return write_csv(&[result], &path);
                }
            };
            emit(&content, output.as_deref())?;
        }
        Command::Scan {
            export,
            format,
            output,
            show_details,
            include_fbm_duplicates,
            concurrent,
        } => {
            config.dedup.include_fbm_duplicates |= include_fbm_duplicates;
            config.engine.concurrent |= concurrent;

            let export = load_export(&export, &config)?;
            let engine = build_engine(&config, &export)?;

            let run = if config.engine.concurrent {
                engine.run_all_concurrent(&export.listings).await
            } else {
                engine.run_all(&export.listings)
            }
            .context("Scan aborted")?;

            let timestamp = Utc::now();
            let aggregator = ResultAggregator::new();
            let content = match format {
                OutputFormat::Terminal => {
                    let summary = aggregator.summarize(&run, timestamp);
                    TerminalFormatter::format_scan(&run.results, &summary, show_details)
                }
                OutputFormat::Json => render_json(&aggregator.build_report(&run.results, timestamp))?,
                OutputFormat::Csv => {
                    let path = output.unwrap_or_else(|| default_csv_path(None));
                    return write_csv(&run.results, &path);
                }
            };
            emit(&content, output.as_deref())?;
        }
    }

    Ok(())
}

fn load_export(path: &Path, config: &AuditConfig) -> Result<CatalogExport> {
    CatalogExport::load_with(path, &config.export)
        .with_context(|| format!("Failed to load catalog export {}", path.display()))
}

fn write_csv(results: &[QueryResult], path: &Path) -> Result<()> {
    let content = render_csv(results).context("Failed to render CSV")?;
    emit(&content, Some(path)).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn build_engine(config: &AuditConfig, export: &CatalogExport) -> Result<QueryEngine> {
    Ok(QueryEngineBuilder::from_config(config)
        .schema(export.schema.clone())
        .with_builtin_queries()?
        .build())
}
