//! Configuration loading and config file resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CATALOG_AUDIT_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/catalog-audit/config.toml`)
//! 4. Built-in defaults (fallback)
//!
//! An explicitly named file (1 or 2) must exist and parse. A missing file at
//! the platform location is not an error: a warning is logged and defaults
//! are used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::listing::Listing;
use crate::rules::RuleSet;
use crate::{Error, Result};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "CATALOG_AUDIT_CONFIG";

/// Complete tool configuration (TOML)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
    pub export: ExportConfig,
    pub dedup: DedupConfig,
    pub rules: RuleSet,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// What the engine does when one query fails during a full scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure in that query's result and keep running the others
    #[default]
    Degrade,
    /// Stop the scan and return the failure
    Abort,
}

/// Query engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub failure_policy: FailurePolicy,
    /// Run queries on the blocking thread pool
    pub concurrent: bool,
}

/// Which export rows are audited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Drop variation parent rows (`Parentage` containing "parent")
    pub skip_parents: bool,
    /// Drop template example rows (SKU in `example_skus`)
    pub skip_examples: bool,
    /// Placeholder SKUs shipped in blank report templates (case-insensitive)
    pub example_skus: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            skip_parents: true,
            skip_examples: true,
            example_skus: ["ABC123", "EXAMPLE", "TEST"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExportConfig {
    /// Whether a listing row should be audited
    pub fn keeps(&self, listing: &Listing) -> bool {
        let sku = listing.sku.trim();
        if sku.is_empty() {
            return false;
        }
        if self.skip_examples && self.example_skus.iter().any(|e| e.eq_ignore_ascii_case(sku)) {
            return false;
        }
        !(self.skip_parents && listing.parentage.to_lowercase().contains("parent"))
    }
}

/// Duplicate suppression settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Audit FBM/MFN shadow listings too (disables suppression)
    pub include_fbm_duplicates: bool,
    /// Minimum normalized Levenshtein similarity for item names
    pub similarity_threshold: f64,
    /// Fulfillment-channel marker tokens
    pub markers: Vec<String>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            include_fbm_duplicates: false,
            similarity_threshold: 0.85,
            markers: ["FBA", "FBM", "MFN", "AFN"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl AuditConfig {
    /// Parse TOML configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AuditConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.dedup.similarity_threshold) {
            return Err(Error::Config(format!(
                "dedup.similarity_threshold must be within 0.0..=1.0, got {}",
                self.dedup.similarity_threshold
            )));
        }
        if !(1.0..=5.0).contains(&self.rules.rufus_threshold) {
            return Err(Error::Config(format!(
                "rules.rufus_threshold must be within 1.0..=5.0, got {}",
                self.rules.rufus_threshold
            )));
        }
        if self.rules.bullet_min_length > self.rules.bullet_max_length {
            return Err(Error::Config(
                "rules.bullet_min_length exceeds rules.bullet_max_length".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where a resolved config file came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    ConfigDir(PathBuf),
    Defaults,
}

/// Config file resolver
pub struct ConfigResolver {
    cli_arg: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self { cli_arg }
    }

    /// Determine which config file (if any) applies
    pub fn resolve(&self) -> ConfigSource {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return ConfigSource::CommandLine(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config directory
        if let Some(path) = default_config_path() {
            if path.exists() {
                return ConfigSource::ConfigDir(path);
            }
        }

        // Priority 4: Built-in defaults
        ConfigSource::Defaults
    }

    /// Resolve and load the configuration
    pub fn load(&self) -> Result<AuditConfig> {
        let (config, source) = self.load_with_source()?;
        match &source {
            ConfigSource::Defaults => warn!("No config file found, using built-in defaults"),
            _ => info!(source = ?source, "Configuration loaded"),
        }
        Ok(config)
    }

    /// Resolve and load the configuration without logging
    ///
    /// For callers that read config before a subscriber is installed and
    /// report the source afterwards.
    pub fn load_with_source(&self) -> Result<(AuditConfig, ConfigSource)> {
        let source = self.resolve();
        let config = match &source {
            ConfigSource::CommandLine(path)
            | ConfigSource::Environment(path)
            | ConfigSource::ConfigDir(path) => AuditConfig::load(path)?,
            ConfigSource::Defaults => AuditConfig::default(),
        };
        Ok((config, source))
    }
}

/// Platform config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("catalog-audit").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = AuditConfig::from_toml("").unwrap();
        assert_eq!(config, AuditConfig::default());
        assert_eq!(config.engine.failure_policy, FailurePolicy::Degrade);
        assert!(!config.dedup.include_fbm_duplicates);
        assert_eq!(config.dedup.similarity_threshold, 0.85);
    }

    #[test]
    fn test_sections_override() {
        let config = AuditConfig::from_toml(
            r#"
            [logging]
            level = "debug"

            [engine]
            failure_policy = "abort"
            concurrent = true

            [dedup]
            include_fbm_duplicates = true

            [rules]
            max_title_length = 180
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.engine.failure_policy, FailurePolicy::Abort);
        assert!(config.engine.concurrent);
        assert!(config.dedup.include_fbm_duplicates);
        assert_eq!(config.dedup.markers.len(), 4);
        assert_eq!(config.rules.max_title_length, 180);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = AuditConfig::from_toml("[dedup]\nsimilarity_threshold = 1.5");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = AuditConfig::from_toml("[engine]\nfailure_policy = \"retry\"");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_cli_arg_wins() {
        let resolver = ConfigResolver::new(Some(PathBuf::from("/tmp/explicit.toml")));
        assert_eq!(
            resolver.resolve(),
            ConfigSource::CommandLine(PathBuf::from("/tmp/explicit.toml"))
        );
    }
}
