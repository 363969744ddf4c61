//! Tracing setup for the `pdf-finder` binary.
//!
//! Events go to two places: stderr, for the operator, and a plain-text log
//! file that sits next to the manifests by default. `RUST_LOG` overrides
//! the default filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{FinderError, Result};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "pdf_finder=info,pdf_finder_search=info";

/// Install the global subscriber, appending to `log_file`.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the whole run.
///
/// # Errors
///
/// Returns [`FinderError::Io`] if the log directory cannot be created and
/// [`FinderError::Config`] if a global subscriber is already installed.
pub fn init(log_file: &Path) -> Result<WorkerGuard> {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let file_name = log_file.file_name().ok_or_else(|| {
        FinderError::Config(format!("LOG_FILE {} has no file name", log_file.display()))
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| FinderError::Config(format!("failed to install logger: {e}")))?;

    Ok(guard)
}
