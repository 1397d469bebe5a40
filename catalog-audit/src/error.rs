//! Error types for catalog-audit

use thiserror::Error;

use crate::types::PluginError;

/// Audit engine error
#[derive(Debug, Error)]
pub enum AuditError {
    /// Requested query is not registered
    #[error("Unknown query: {0}")]
    QueryNotFound(String),

    /// A query plugin failed while evaluating listings
    #[error("Query '{query}' failed: {source}")]
    PluginExecution {
        query: String,
        #[source]
        source: PluginError,
    },

    /// Two plugins registered under the same name
    #[error("Query already registered: {0}")]
    DuplicateQuery(String),

    /// Plugin rejected at registration (e.g. empty name)
    #[error("Invalid query plugin: {0}")]
    InvalidPlugin(String),

    /// catalog-common error
    #[error(transparent)]
    Common(#[from] catalog_common::Error),
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;
