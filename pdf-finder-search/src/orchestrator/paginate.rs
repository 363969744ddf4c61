//! Paginated search loop: fetch pages sequentially and accumulate results.
//!
//! Pages are requested one at a time. The loop stops when the backend
//! reports no next page or when the configured page budget is spent,
//! whichever comes first.

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::types::SearchResult;

/// First `start` index sent to the API.
const FIRST_START: u32 = 1;

/// Run `query` against `backend`, following next-page indices up to
/// `config.pages` pages.
///
/// # Pipeline
///
/// 1. Request the page at `start` (initially 1)
/// 2. Append every item on the page
/// 3. Stop if the page advertised no next start index
/// 4. Otherwise sleep for the configured delay and continue from that index
///
/// # Errors
///
/// Returns the first [`SearchError`] raised by the backend. Results already
/// accumulated for this query are discarded with it.
pub async fn paginate<B: SearchBackend>(
    backend: &B,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError> {
    let mut results = Vec::new();
    let mut start = FIRST_START;

    for page in 1..=config.pages {
        tracing::debug!(backend = backend.name(), page, start, "requesting page");
        let fetched = backend.fetch_page(query, start).await?;
        tracing::debug!(page, count = fetched.items.len(), "page received");
        results.extend(fetched.items);

        let Some(next) = fetched.next_start else {
            tracing::debug!(page, "no more pages");
            break;
        };
        start = next;

        if page < config.pages {
            if let Some(delay) = config.page_delay() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    tracing::debug!(count = results.len(), "search finished");
    Ok(results)
}
