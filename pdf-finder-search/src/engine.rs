//! Trait definition for pluggable search backends.
//!
//! A backend fetches exactly one page of results per call. Pagination,
//! delays and accumulation live in [`crate::orchestrator::paginate`], so a
//! backend only has to know its own wire format.

use crate::error::SearchError;
use crate::types::SearchPage;

/// A source of paged search results.
///
/// Implementors handle:
///
/// - Request construction (credentials, query encoding, file-type restriction)
/// - The HTTP request itself
/// - Decoding the response into a [`SearchPage`]
///
/// All implementations must be `Send + Sync`.
pub trait SearchBackend: Send + Sync {
    /// Fetch the page of results for `query` starting at the 1-based index `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] for transport failures and non-success
    /// statuses, and [`SearchError::Parse`] for undecodable responses.
    fn fetch_page(
        &self,
        query: &str,
        start: u32,
    ) -> impl std::future::Future<Output = Result<SearchPage, SearchError>> + Send;

    /// Human-readable backend name, used in log fields.
    fn name(&self) -> &'static str;
}
