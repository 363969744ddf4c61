//! Result deduplication by exact link.
//!
//! Keeps the first occurrence of every distinct `link` and drops later
//! ones, so a document found by several queries is attributed to the
//! query that found it first. Links are compared as raw strings: no
//! scheme, host, trailing-slash or query-string normalisation.

use std::collections::HashSet;

use crate::types::SearchResult;

/// Deduplicate `results` by `link`, preserving first-seen order.
pub fn deduplicate(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::with_capacity(results.len());
    let before = results.len();

    let unique: Vec<SearchResult> = results
        .into_iter()
        .filter(|result| seen.insert(result.link.clone()))
        .collect();

    tracing::debug!(before, after = unique.len(), "deduplicated results by link");
    unique
}
