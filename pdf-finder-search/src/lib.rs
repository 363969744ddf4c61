//! # pdf-finder-search
//!
//! Paginated document search against a Custom Search JSON API.
//!
//! ## Design
//!
//! - One request per page, strictly sequential, with an optional fixed
//!   delay between pages
//! - Pagination follows the API's next-page index and stops as soon as it
//!   is absent, or when the page budget runs out
//! - Results from several queries are deduplicated by exact link, keeping
//!   the first sighting
//! - No retries and no caching: a failed page fails the whole query and the
//!   caller decides what to do
//!
//! ## Security
//!
//! - The API key is sent only as a query parameter and stripped from
//!   transport error messages
//! - Queries are logged only at trace level

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod types;

pub use config::SearchConfig;
pub use engine::SearchBackend;
pub use engines::CustomSearchEngine;
pub use error::{Result, SearchError};
pub use orchestrator::dedup::deduplicate;
pub use orchestrator::paginate::paginate;
pub use types::{SearchPage, SearchResult};

/// Search for documents matching `query` using the Custom Search JSON API.
///
/// Builds a [`CustomSearchEngine`] from `config` and runs the paginated
/// loop. Callers issuing several queries should build the engine once and
/// call [`paginate`] directly.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration, and any
/// error raised while fetching a page.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> pdf_finder_search::Result<()> {
/// let config = pdf_finder_search::SearchConfig::new("api-key", "engine-id");
/// let results = pdf_finder_search::search("personal branding seo", &config).await?;
/// for result in &results {
///     println!("{}: {}", result.title, result.link);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    let engine = CustomSearchEngine::new(config)?;
    paginate(&engine, query, config).await
}
