//! Run events and the recorder interface.
//!
//! The run driver reports what it is doing through a [`RunRecorder`]
//! instead of printing or logging directly. The binary uses
//! [`ConsoleRecorder`]; tests pass a closure that collects events.

use std::path::PathBuf;

/// Events emitted by the run driver, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// The run is starting.
    RunStarted {
        /// Queries that will be searched.
        queries: Vec<String>,
        /// Download directory.
        out_dir: PathBuf,
        /// Manifest directory.
        manifest_dir: PathBuf,
    },

    /// Searching for one query has started.
    QueryStarted {
        /// The query.
        query: String,
    },

    /// Searching for one query failed; it contributes no results.
    QueryFailed {
        /// The query.
        query: String,
        /// Human-readable error description.
        message: String,
    },

    /// Searching for one query finished.
    QueryFinished {
        /// The query.
        query: String,
        /// Number of results collected (0 after a failure).
        count: usize,
    },

    /// Results from all queries were deduplicated by link.
    Deduplicated {
        /// Results before deduplication.
        before: usize,
        /// Unique links after deduplication.
        unique: usize,
    },

    /// A download is about to start.
    DownloadStarted {
        /// 1-based position in the unique link list.
        index: usize,
        /// Length of the unique link list.
        total: usize,
        /// The link being fetched.
        url: String,
    },

    /// A document was saved.
    DownloadSaved {
        /// The link that was fetched.
        url: String,
        /// Where it was written.
        path: PathBuf,
    },

    /// A link was skipped.
    DownloadSkipped {
        /// The link that was fetched.
        url: String,
        /// Why it was skipped.
        reason: String,
    },

    /// Both manifest files were written.
    ManifestWritten {
        /// Path of the JSON manifest.
        json_path: PathBuf,
        /// Path of the CSV manifest.
        csv_path: PathBuf,
    },

    /// The run is complete.
    RunFinished {
        /// Number of documents saved.
        downloaded: usize,
        /// Number of links skipped.
        skipped: usize,
        /// Download directory.
        out_dir: PathBuf,
    },
}

/// Receives [`RunEvent`]s from the run driver.
///
/// Any `Fn(&RunEvent)` closure is a recorder.
pub trait RunRecorder {
    /// Handle one event.
    fn record(&self, event: &RunEvent);
}

impl<F> RunRecorder for F
where
    F: Fn(&RunEvent),
{
    fn record(&self, event: &RunEvent) {
        self(event);
    }
}

/// Recorder that prints operator progress lines to stdout and mirrors every
/// event into `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRecorder;

impl RunRecorder for ConsoleRecorder {
    fn record(&self, event: &RunEvent) {
        if let Some(line) = console_line(event) {
            println!("{line}");
        }
        trace_event(event);
    }
}

/// The stdout line for `event`, if it has one.
pub fn console_line(event: &RunEvent) -> Option<String> {
    match event {
        RunEvent::QueryStarted { query } => Some(format!("[search] {query}")),
        RunEvent::QueryFailed { message, .. } => Some(format!("  -> {message}")),
        RunEvent::QueryFinished { count, .. } => Some(format!("  -> {count} results")),
        RunEvent::Deduplicated { unique, .. } => Some(format!("[dedupe] {unique} unique links")),
        RunEvent::DownloadStarted { index, total, url } => {
            Some(format!("[{index}/{total}] Downloading: {url}"))
        }
        RunEvent::ManifestWritten {
            json_path,
            csv_path,
        } => Some(format!(
            "Saved manifest: {} and {}",
            json_path.display(),
            csv_path.display()
        )),
        RunEvent::RunFinished { out_dir, .. } => {
            Some(format!("PDFs saved in: {}", out_dir.display()))
        }
        RunEvent::RunStarted { .. }
        | RunEvent::DownloadSaved { .. }
        | RunEvent::DownloadSkipped { .. } => None,
    }
}

fn trace_event(event: &RunEvent) {
    match event {
        RunEvent::RunStarted {
            queries,
            out_dir,
            manifest_dir,
        } => tracing::info!(
            ?queries,
            out_dir = %out_dir.display(),
            manifest_dir = %manifest_dir.display(),
            "run started"
        ),
        RunEvent::QueryStarted { query } => tracing::info!(query = %query, "search started"),
        RunEvent::QueryFailed { query, message } => {
            tracing::error!(query = %query, error = %message, "search failed");
        }
        RunEvent::QueryFinished { query, count } => {
            tracing::info!(query = %query, count, "search finished");
        }
        RunEvent::Deduplicated { before, unique } => {
            tracing::info!(before, unique, "deduplicated by link");
        }
        RunEvent::DownloadStarted { index, total, url } => {
            tracing::info!(index, total, url = %url, "downloading");
        }
        RunEvent::DownloadSaved { url, path } => {
            tracing::info!(url = %url, saved_as = %path.display(), "download saved");
        }
        RunEvent::DownloadSkipped { url, reason } => {
            tracing::warn!(url = %url, reason = %reason, "download skipped");
        }
        RunEvent::ManifestWritten {
            json_path,
            csv_path,
        } => tracing::info!(
            json = %json_path.display(),
            csv = %csv_path.display(),
            "manifest written"
        ),
        RunEvent::RunFinished {
            downloaded,
            skipped,
            out_dir,
        } => tracing::info!(downloaded, skipped, out_dir = %out_dir.display(), "run finished"),
    }
}
