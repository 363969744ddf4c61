//! Shared HTTP client for search API requests.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Build a [`reqwest::Client`] configured for search API requests.
///
/// The client has:
/// - Connect and per-read timeouts from config
/// - Custom User-Agent if configured
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let mut builder = reqwest::Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(ref ua) = config.user_agent {
        builder = builder.user_agent(ua.clone());
    }

    builder
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}
