//! Error types for the pdf-finder run.
//!
//! Only failures that abort the whole run are represented here. Per-query
//! search failures and per-link download failures are reported as values
//! and never surface as a [`FinderError`].

use pdf_finder_search::SearchError;

/// Top-level error type for a pdf-finder run.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Missing or invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Search client construction failed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Manifest serialisation failed.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for FinderError {
    fn from(err: csv::Error) -> Self {
        Self::Manifest(format!("CSV write failed: {err}"))
    }
}

impl From<serde_json::Error> for FinderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Manifest(format!("JSON write failed: {err}"))
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, FinderError>;
