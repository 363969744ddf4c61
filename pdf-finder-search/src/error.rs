//! Error types for the pdf-finder-search crate.
//!
//! All errors use stable string messages suitable for display to the
//! operator. The API key never appears in error messages.

/// Errors that can occur while searching.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The search API request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The search API response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for pdf-finder-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
