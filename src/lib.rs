//! pdf-finder: batch PDF discovery and download.
//!
//! A run searches a Custom Search JSON API for every configured query,
//! collapses the hits to one entry per link, downloads each link, and
//! writes a JSON and CSV manifest of what was found and what was saved.
//!
//! # Architecture
//!
//! The run is a straight line, executed sequentially:
//! config → search → dedupe → download → manifest
//!
//! - **Search**: paginated queries via the `pdf-finder-search` crate
//! - **Dedupe**: first-seen wins, exact link equality
//! - **Download**: streaming GET, PDF check, collision-free file names
//! - **Manifest**: `pdf_results.json` and `pdf_results.csv`, rewritten each run
//!
//! Per-query and per-link failures are recorded and the run carries on;
//! only configuration errors and manifest write failures abort it.

pub mod config;
pub mod download;
pub mod error;
pub mod events;
pub mod filename;
pub mod logging;
pub mod manifest;
pub mod run;

pub use config::FinderConfig;
pub use download::{DownloadOutcome, Downloader};
pub use error::{FinderError, Result};
pub use events::{ConsoleRecorder, RunEvent, RunRecorder};
pub use manifest::{EntryStatus, ManifestEntry};
pub use run::RunSummary;
