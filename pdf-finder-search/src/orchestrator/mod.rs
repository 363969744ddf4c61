//! Search orchestrator: sequential pagination and first-seen dedup.
//!
//! [`paginate`] drives a [`crate::SearchBackend`] page by page for one
//! query; [`dedup`] collapses results gathered across queries to one entry
//! per link.

pub mod dedup;
pub mod paginate;
