//! Error types for audit runs.
//!
//! Every variant aborts the run. Nothing is retried: an audit is read-only
//! against the corpus, so the recovery is to fix the cause and run again.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading from a corpus source.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record at {path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot walk corpus directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Errors that abort an audit run.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Bad selector, rule file or pattern; raised before scanning starts.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("corpus access failed: {0}")]
    CorpusAccess(#[from] CorpusError),
    /// Raised after the in-memory report and console sample exist.
    #[error("failed to write report to {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scan cancelled after {scanned} records")]
    Cancelled { scanned: usize },
}

impl AuditError {
    pub fn config(msg: impl Into<String>) -> Self {
        AuditError::Configuration(msg.into())
    }
}
