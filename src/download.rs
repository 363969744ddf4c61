//! Document downloader.
//!
//! Fetches one link with a single streaming GET, checks that the response
//! is a PDF, and writes the body under a collision-free name in the output
//! directory. Every failure is returned as [`DownloadOutcome::Skipped`]
//! with a short reason; nothing is retried.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{FinderError, Result};
use crate::filename::derive_base_name;

/// File extension of downloaded documents.
pub const EXTENSION: &str = "pdf";
/// MIME type that marks a response as a document.
pub const DOCUMENT_MIME: &str = "application/pdf";
/// Highest collision suffix tried before giving up.
pub const MAX_COLLISION_SUFFIX: u32 = 9999;

/// Result of one download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The document was written to this path.
    Saved(PathBuf),
    /// Nothing was kept; the reason is human-readable.
    Skipped(String),
}

impl DownloadOutcome {
    /// Returns `true` for [`DownloadOutcome::Saved`].
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Settings for [`Downloader`].
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Directory documents are written to; created on first save.
    pub out_dir: PathBuf,
    /// Connect and per-read inactivity timeout in seconds. A slow transfer
    /// that keeps receiving data is never cut off.
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

/// Downloads documents into a single output directory.
pub struct Downloader {
    client: reqwest::Client,
    out_dir: PathBuf,
}

impl Downloader {
    /// Build a downloader for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FinderError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            out_dir: config.out_dir.clone(),
        })
    }

    /// The directory documents are written to.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Fetch `url` and save it under a name derived from `title_hint`.
    pub async fn download(&self, url: &str, title_hint: &str) -> DownloadOutcome {
        let base = derive_base_name(url, title_hint);
        tracing::debug!(url, title_hint, base = %base, "download requested");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return skipped(url, error_chain(&e)),
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return skipped(url, format!("HTTP {}", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        if !is_document(content_type.as_deref(), url) {
            return skipped(
                url,
                format!("Not a PDF ({})", content_type.as_deref().unwrap_or("none")),
            );
        }

        let (path, file) = match create_unique_file(&self.out_dir, &base).await {
            Ok(reserved) => reserved,
            Err(e) => return skipped(url, error_chain(&e)),
        };

        if let Err(e) = stream_to_file(response, file).await {
            if let Err(remove_err) = fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove partial download");
            }
            return skipped(url, e);
        }

        tracing::debug!(url, path = %path.display(), "download saved");
        DownloadOutcome::Saved(path)
    }
}

fn skipped(url: &str, reason: String) -> DownloadOutcome {
    tracing::debug!(url, reason = %reason, "download skipped");
    DownloadOutcome::Skipped(reason)
}

/// Whether a response is accepted as a document: a PDF content type, or a
/// URL ending in `.pdf`. Both checks are case-insensitive.
pub fn is_document(content_type: Option<&str>, url: &str) -> bool {
    let declared = content_type
        .map(|ct| ct.to_ascii_lowercase().contains(DOCUMENT_MIME))
        .unwrap_or(false);
    declared || url.to_ascii_lowercase().ends_with(&format!(".{EXTENSION}"))
}

/// Candidate file name for `base` with collision suffix `n` (`n < 2` means none).
pub fn candidate_name(base: &str, n: u32) -> String {
    if n < 2 {
        format!("{base}.{EXTENSION}")
    } else {
        format!("{base} ({n}).{EXTENSION}")
    }
}

/// Create a new file for `base` in `dir`, appending ` (2)`, ` (3)`, … until
/// a name is free.
///
/// Files are opened with create-new semantics, so an existing file is never
/// truncated even if another process races for the same name.
///
/// # Errors
///
/// Returns the underlying I/O error, or [`io::ErrorKind::AlreadyExists`]
/// once every suffix up to [`MAX_COLLISION_SUFFIX`] is taken.
pub async fn create_unique_file(dir: &Path, base: &str) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(dir).await?;

    for n in std::iter::once(1).chain(2..=MAX_COLLISION_SUFFIX) {
        let path = dir.join(candidate_name(base, n));
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {}", candidate_name(base, 1)),
    ))
}

async fn stream_to_file(response: reqwest::Response, mut file: File) -> std::result::Result<(), String> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| error_chain(&e))?;
        file.write_all(&chunk).await.map_err(|e| error_chain(&e))?;
    }
    file.flush().await.map_err(|e| error_chain(&e))?;
    Ok(())
}

/// `err` and each of its sources, joined with `": "`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
