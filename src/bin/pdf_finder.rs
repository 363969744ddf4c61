//! `pdf-finder` binary: one batch run configured from the environment.
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file in the working directory or one of its parents. Progress
//! lines go to stdout; tracing output goes to stderr and the log file.

use pdf_finder::events::ConsoleRecorder;
use pdf_finder::{FinderConfig, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            anyhow::bail!("failed to read .env: {e}");
        }
    }

    let config = FinderConfig::from_env()?;
    let _guard = logging::init(&config.log_file)?;

    for setting in &config.ignored {
        tracing::warn!(setting = %setting, "invalid setting, using default");
    }
    tracing::info!(log_file = %config.log_file.display(), "=== run started ===");

    let summary = run::run(&config, &ConsoleRecorder).await.map_err(|e| {
        tracing::error!(error = %e, "run aborted");
        anyhow::anyhow!("pdf-finder failed: {e}")
    })?;

    tracing::info!(
        queries = summary.queries,
        failed_queries = summary.failed_queries,
        found = summary.found,
        unique = summary.entries.len(),
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        "=== run finished ==="
    );
    Ok(())
}
