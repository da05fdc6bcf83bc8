//! Error types
//!
//! Editing never fails: out-of-range references and conflicting insertions are
//! no-ops. Only loading documents and configuration can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring an external document up to the current schema
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Neither `version` nor the legacy `v` key is present
    #[error("document has no version tag")]
    MissingVersion,

    /// Version outside the known upgrade chain (fatal to the caller)
    #[error("unsupported document version: {0}")]
    UnsupportedVersion(String),

    /// Structurally invalid document
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to load engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config as YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
