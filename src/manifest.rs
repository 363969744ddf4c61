//! Manifest entries and the JSON/CSV manifest writer.
//!
//! Every unique link found in a run becomes one [`ManifestEntry`]. After
//! the download attempt its outcome is recorded once, and the whole list
//! is written to `pdf_results.json` and `pdf_results.csv`, replacing any
//! previous run's files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use pdf_finder_search::SearchResult;
use serde::{Deserialize, Serialize};

use crate::download::DownloadOutcome;
use crate::error::Result;

/// File name of the JSON manifest.
pub const JSON_MANIFEST: &str = "pdf_results.json";
/// File name of the CSV manifest.
pub const CSV_MANIFEST: &str = "pdf_results.csv";
/// CSV column order.
pub const CSV_COLUMNS: [&str; 8] = [
    "query", "title", "link", "snippet", "mime", "status", "saved_as", "error",
];

/// Download outcome of a manifest entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Not processed yet.
    #[default]
    #[serde(rename = "")]
    Pending,
    /// The document was saved.
    #[serde(rename = "downloaded")]
    Downloaded,
    /// The link was skipped; `error` says why.
    #[serde(rename = "skipped")]
    Skipped,
}

impl EntryStatus {
    /// The manifest string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "",
            Self::Downloaded => "downloaded",
            Self::Skipped => "skipped",
        }
    }
}

/// A search result annotated with its download outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Query that first produced this link.
    pub query: String,
    /// Result title.
    pub title: String,
    /// Result link.
    pub link: String,
    /// Result snippet.
    pub snippet: String,
    /// MIME type reported by the search API.
    pub mime: String,
    /// Download outcome.
    pub status: EntryStatus,
    /// Saved file path; empty unless `status` is `Downloaded`.
    pub saved_as: String,
    /// Skip reason; empty unless `status` is `Skipped`.
    pub error: String,
}

impl From<SearchResult> for ManifestEntry {
    fn from(result: SearchResult) -> Self {
        Self {
            query: result.query,
            title: result.title,
            link: result.link,
            snippet: result.snippet,
            mime: result.mime,
            status: EntryStatus::Pending,
            saved_as: String::new(),
            error: String::new(),
        }
    }
}

impl ManifestEntry {
    /// Record the download outcome for this entry.
    ///
    /// Sets exactly one of `saved_as` / `error`, clearing the other.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Saved(path) => {
                self.status = EntryStatus::Downloaded;
                self.saved_as = path.display().to_string();
                self.error.clear();
            }
            DownloadOutcome::Skipped(reason) => {
                self.status = EntryStatus::Skipped;
                self.saved_as.clear();
                self.error = reason.clone();
            }
        }
    }

    fn csv_record(&self) -> [&str; 8] {
        [
            &self.query,
            &self.title,
            &self.link,
            &self.snippet,
            &self.mime,
            self.status.as_str(),
            &self.saved_as,
            &self.error,
        ]
    }
}

/// Paths of the two manifest files written for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
    /// The JSON manifest.
    pub json: PathBuf,
    /// The CSV manifest.
    pub csv: PathBuf,
}

/// Write `entries` to the JSON and CSV manifests under `dir`.
///
/// Creates `dir` if needed and overwrites existing manifests.
///
/// # Errors
///
/// Returns an error if the directory or either file cannot be written.
pub fn write_manifest(dir: &Path, entries: &[ManifestEntry]) -> Result<ManifestPaths> {
    fs::create_dir_all(dir)?;
    let paths = ManifestPaths {
        json: dir.join(JSON_MANIFEST),
        csv: dir.join(CSV_MANIFEST),
    };

    write_json(&paths.json, entries)?;
    write_csv(&paths.csv, entries)?;

    tracing::debug!(
        entries = entries.len(),
        json = %paths.json.display(),
        csv = %paths.csv.display(),
        "manifest saved"
    );
    Ok(paths)
}

fn write_json(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, entries)?;
    file.flush()?;
    Ok(())
}

fn write_csv(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;
    for entry in entries {
        writer.write_record(entry.csv_record())?;
    }
    writer.flush()?;
    Ok(())
}
