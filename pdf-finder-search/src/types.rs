//! Core types for search results and result pages.

use serde::{Deserialize, Serialize};

/// A single hit returned by the search API for one query.
///
/// `link` is the identity of a result: deduplication keys on it with
/// exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The query string that produced this hit (without the file-type suffix).
    pub query: String,
    /// The title of the result document.
    pub title: String,
    /// The URL of the result document.
    pub link: String,
    /// A text snippet summarising the document.
    pub snippet: String,
    /// MIME type reported by the search API, if any.
    pub mime: String,
}

/// One page of results from a [`crate::SearchBackend`].
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Hits on this page, in API order.
    pub items: Vec<SearchResult>,
    /// 1-based start index of the next page, if the API advertised one.
    pub next_start: Option<u32>,
}

impl SearchPage {
    /// Returns `true` when the API indicated there is another page.
    pub fn has_next(&self) -> bool {
        self.next_start.is_some()
    }
}
