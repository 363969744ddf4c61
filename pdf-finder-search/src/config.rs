//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] carries the API credentials, endpoint, pagination budget
//! and request behaviour. Only `api_key` and `cx` have no usable default.

use std::time::Duration;

use crate::error::SearchError;

/// Default Custom Search JSON API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Configuration for a paginated search.
///
/// Use [`SearchConfig::new`] with the credentials and override fields as
/// needed.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// API key sent as the `key` parameter.
    pub api_key: String,
    /// Search engine identifier sent as the `cx` parameter.
    pub cx: String,
    /// Base URL of the search API.
    pub endpoint: String,
    /// Maximum number of pages to request per query.
    pub pages: u32,
    /// Results requested per page (`num`).
    pub results_per_page: u32,
    /// Pause between consecutive page requests, in seconds. `0.0` disables it.
    pub page_delay_seconds: f64,
    /// Connect and per-read HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// File type restriction, used for both `fileType` and the `filetype:` query suffix.
    pub file_type: String,
    /// Whether to ask the API for safe search filtering.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, reqwest's default is sent.
    pub user_agent: Option<String>,
}

impl SearchConfig {
    /// Create a configuration with the given credentials and default settings.
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            cx: cx.into(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            pages: 10,
            results_per_page: 10,
            page_delay_seconds: 0.0,
            timeout_seconds: 30,
            file_type: "pdf".to_owned(),
            safe_search: false,
            user_agent: None,
        }
    }

    /// The inter-page delay, if one is configured.
    pub fn page_delay(&self) -> Option<Duration> {
        if self.page_delay_seconds > 0.0 {
            Some(Duration::from_secs_f64(self.page_delay_seconds))
        } else {
            None
        }
    }

    /// The `q` parameter for `query`: the query plus the file-type restriction.
    pub fn restricted_query(&self, query: &str) -> String {
        format!("{query} filetype:{}", self.file_type)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `api_key` and `cx` must not be empty
    /// - `endpoint` must be an absolute URL
    /// - `results_per_page` and `timeout_seconds` must be greater than 0
    /// - `page_delay_seconds` must be finite and non-negative
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::Config("api_key must not be empty".into()));
        }
        if self.cx.trim().is_empty() {
            return Err(SearchError::Config("cx must not be empty".into()));
        }
        if let Err(e) = url::Url::parse(&self.endpoint) {
            return Err(SearchError::Config(format!(
                "endpoint {:?} is not a valid URL: {e}",
                self.endpoint
            )));
        }
        if self.results_per_page == 0 {
            return Err(SearchError::Config(
                "results_per_page must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if !self.page_delay_seconds.is_finite() || self.page_delay_seconds < 0.0 {
            return Err(SearchError::Config(
                "page_delay_seconds must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}
