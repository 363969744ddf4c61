//! Custom Search JSON API backend.
//!
//! Issues one GET per page against the configured endpoint with
//! `key`, `cx`, `q`, `fileType`, `num`, `start` and `safe` parameters and
//! decodes the JSON body. The next page index comes from
//! `queries.nextPage[0].startIndex`.

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchPage, SearchResult};

/// Client for the Custom Search JSON API.
pub struct CustomSearchEngine {
    client: reqwest::Client,
    config: SearchConfig,
}

impl CustomSearchEngine {
    /// Build an engine for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            client: http::build_client(config)?,
            config: config.clone(),
        })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl SearchBackend for CustomSearchEngine {
    async fn fetch_page(&self, query: &str, start: u32) -> Result<SearchPage, SearchError> {
        let q = self.config.restricted_query(query);
        let num = self.config.results_per_page.to_string();
        let start_param = start.to_string();
        let safe = if self.config.safe_search { "active" } else { "off" };

        let params = [
            ("key", self.config.api_key.as_str()),
            ("cx", self.config.cx.as_str()),
            ("q", q.as_str()),
            ("fileType", self.config.file_type.as_str()),
            ("num", num.as_str()),
            ("start", start_param.as_str()),
            ("safe", safe),
        ];

        tracing::trace!(query, start, "custom search request");

        // `without_url` keeps the API key out of error messages.
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("search request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(format!(
                "search API returned status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("search response read failed: {}", e.without_url())))?;

        tracing::trace!(bytes = body.len(), "custom search response received");

        parse_response(&body, query)
    }

    fn name(&self) -> &'static str {
        "custom-search"
    }
}

#[derive(Debug, Deserialize)]
struct ResponseWire {
    #[serde(default)]
    items: Vec<ItemWire>,
    #[serde(default)]
    queries: Option<QueriesWire>,
}

#[derive(Debug, Deserialize)]
struct ItemWire {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    mime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueriesWire {
    #[serde(rename = "nextPage", default)]
    next_page: Vec<PageRefWire>,
}

#[derive(Debug, Deserialize)]
struct PageRefWire {
    #[serde(rename = "startIndex", default)]
    start_index: Option<u32>,
}

/// Decode a Custom Search JSON response into a [`SearchPage`].
///
/// Absent item fields become empty strings. A missing or zero
/// `startIndex` means there is no next page.
pub(crate) fn parse_response(body: &str, query: &str) -> Result<SearchPage, SearchError> {
    let wire: ResponseWire = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid search response: {e}")))?;

    let items = wire
        .items
        .into_iter()
        .map(|item| SearchResult {
            query: query.to_owned(),
            title: item.title.unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            snippet: item.snippet.unwrap_or_default(),
            mime: item.mime.unwrap_or_default(),
        })
        .collect();

    let next_start = wire
        .queries
        .and_then(|q| q.next_page.into_iter().next())
        .and_then(|p| p.start_index)
        .filter(|start| *start > 0);

    Ok(SearchPage { items, next_start })
}
