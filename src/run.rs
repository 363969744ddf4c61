//! Run driver: search every query, dedupe, download, write the manifest.
//!
//! Everything happens in order on the calling task. A failed query
//! contributes no results and a failed download is recorded in its entry;
//! neither stops the run.

use pdf_finder_search::{CustomSearchEngine, SearchBackend, SearchResult, deduplicate, paginate};

use crate::config::FinderConfig;
use crate::download::{DownloadOutcome, Downloader};
use crate::error::Result;
use crate::events::{RunEvent, RunRecorder};
use crate::manifest::{ManifestEntry, ManifestPaths, write_manifest};

/// Counts and artefacts of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of queries searched.
    pub queries: usize,
    /// Queries whose search failed.
    pub failed_queries: usize,
    /// Results collected before deduplication.
    pub found: usize,
    /// Every unique link with its outcome, in manifest order.
    pub entries: Vec<ManifestEntry>,
    /// Number of documents saved.
    pub downloaded: usize,
    /// Number of links skipped.
    pub skipped: usize,
    /// Where the manifest was written.
    pub manifest: ManifestPaths,
}

/// Run the whole job against the configured search API.
///
/// # Errors
///
/// Fails only if the search or download client cannot be built, or the
/// manifest cannot be written.
pub async fn run<R>(config: &FinderConfig, recorder: &R) -> Result<RunSummary>
where
    R: RunRecorder + ?Sized,
{
    let engine = CustomSearchEngine::new(&config.search_config())?;
    let downloader = Downloader::new(&config.download_config())?;
    run_with(&engine, &downloader, config, recorder).await
}

/// Run the whole job with an explicit search backend and downloader.
///
/// # Errors
///
/// Fails only if the manifest cannot be written.
pub async fn run_with<B, R>(
    backend: &B,
    downloader: &Downloader,
    config: &FinderConfig,
    recorder: &R,
) -> Result<RunSummary>
where
    B: SearchBackend,
    R: RunRecorder + ?Sized,
{
    recorder.record(&RunEvent::RunStarted {
        queries: config.queries.clone(),
        out_dir: config.out_dir.clone(),
        manifest_dir: config.manifest_dir.clone(),
    });

    let search_config = config.search_config();
    let mut collected: Vec<SearchResult> = Vec::new();
    let mut failed_queries = 0;

    for query in &config.queries {
        recorder.record(&RunEvent::QueryStarted {
            query: query.clone(),
        });

        let hits = match paginate(backend, query, &search_config).await {
            Ok(hits) => hits,
            Err(e) => {
                failed_queries += 1;
                recorder.record(&RunEvent::QueryFailed {
                    query: query.clone(),
                    message: e.to_string(),
                });
                Vec::new()
            }
        };

        recorder.record(&RunEvent::QueryFinished {
            query: query.clone(),
            count: hits.len(),
        });
        collected.extend(hits);
    }

    let found = collected.len();
    let mut entries: Vec<ManifestEntry> = deduplicate(collected)
        .into_iter()
        .map(ManifestEntry::from)
        .collect();
    recorder.record(&RunEvent::Deduplicated {
        before: found,
        unique: entries.len(),
    });

    let total = entries.len();
    let mut downloaded = 0;
    for (i, entry) in entries.iter_mut().enumerate() {
        recorder.record(&RunEvent::DownloadStarted {
            index: i + 1,
            total,
            url: entry.link.clone(),
        });

        let outcome = downloader.download(&entry.link, &entry.title).await;
        entry.record(&outcome);

        match outcome {
            DownloadOutcome::Saved(path) => {
                downloaded += 1;
                recorder.record(&RunEvent::DownloadSaved {
                    url: entry.link.clone(),
                    path,
                });
            }
            DownloadOutcome::Skipped(reason) => {
                recorder.record(&RunEvent::DownloadSkipped {
                    url: entry.link.clone(),
                    reason,
                });
            }
        }
    }

    let manifest = write_manifest(&config.manifest_dir, &entries)?;
    recorder.record(&RunEvent::ManifestWritten {
        json_path: manifest.json.clone(),
        csv_path: manifest.csv.clone(),
    });

    let skipped = total - downloaded;
    recorder.record(&RunEvent::RunFinished {
        downloaded,
        skipped,
        out_dir: downloader.out_dir().to_path_buf(),
    });

    Ok(RunSummary {
        queries: config.queries.len(),
        failed_queries,
        found,
        entries,
        downloaded,
        skipped,
        manifest,
    })
}
