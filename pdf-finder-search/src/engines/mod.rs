//! Search backend implementations.
//!
//! Each module provides a struct implementing [`crate::engine::SearchBackend`]
//! for a specific search API.

pub mod custom_search;

pub use custom_search::CustomSearchEngine;
