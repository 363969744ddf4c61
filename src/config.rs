//! Run configuration loaded once at process start.
//!
//! [`FinderConfig`] is built from a key lookup (normally the process
//! environment, after an optional `.env` file has been loaded) and is then
//! passed by reference to every component. Nothing else reads the
//! environment.

use std::fmt;
use std::path::{Path, PathBuf};

use pdf_finder_search::SearchConfig;
use pdf_finder_search::config::DEFAULT_ENDPOINT;

use crate::download::DownloadConfig;
use crate::error::{FinderError, Result};

/// Query used when `QUERIES` is unset or blank.
pub const DEFAULT_QUERY: &str = "personal branding seo";
/// Default download directory.
pub const DEFAULT_OUT_DIR: &str = "pdf_downloads";
/// Default manifest directory.
pub const DEFAULT_MANIFEST_DIR: &str = "manifests";
/// Default log file name, resolved under the manifest directory.
pub const DEFAULT_LOG_FILE: &str = "pdf_finder.log";
/// Default User-Agent for download requests.
pub const DEFAULT_USER_AGENT: &str = "pdf-finder/1.0";
/// Default page budget per query.
pub const DEFAULT_PAGES: u32 = 10;
/// Default download timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Search requests use a fixed timeout, independent of `TIMEOUT`.
pub const SEARCH_TIMEOUT_SECS: u64 = 30;

/// Immutable configuration for one run.
#[derive(Clone)]
pub struct FinderConfig {
    /// Search API key (`API_KEY`).
    pub api_key: String,
    /// Search engine identifier (`CX`).
    pub cx: String,
    /// Search API base URL (`API_ENDPOINT`).
    pub endpoint: String,
    /// Directory downloaded documents are written to (`OUT_DIR`).
    pub out_dir: PathBuf,
    /// Directory the manifest files are written to (`MANIFEST_DIR`).
    pub manifest_dir: PathBuf,
    /// Log file path (`LOG_FILE`); relative names live under `manifest_dir`.
    pub log_file: PathBuf,
    /// User-Agent for download requests (`USER_AGENT`).
    pub user_agent: String,
    /// Queries to run, in order (`QUERIES`).
    pub queries: Vec<String>,
    /// Page budget per query (`PAGES`).
    pub pages: u32,
    /// Delay between search pages in seconds (`DELAY`).
    pub delay_seconds: f64,
    /// Download timeout in seconds (`TIMEOUT`).
    pub timeout_seconds: u64,
    /// Settings that were present but invalid and replaced by their defaults,
    /// as `KEY=value`. Loading happens before logging is up, so the caller
    /// reports these.
    pub ignored: Vec<String>,
}

impl FinderConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if `API_KEY` or `CX` is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a key to its raw value.
    ///
    /// Values are trimmed; blank values fall back to defaults, as do numbers
    /// that fail to parse.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if `API_KEY` or `CX` is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let (Some(api_key), Some(cx)) = (get("API_KEY"), get("CX")) else {
            return Err(FinderError::Config(
                "missing required values (API_KEY and CX are mandatory)".into(),
            ));
        };

        let manifest_dir = PathBuf::from(
            get("MANIFEST_DIR").unwrap_or_else(|| DEFAULT_MANIFEST_DIR.to_owned()),
        );
        let log_file = resolve_log_file(
            &manifest_dir,
            &get("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_owned()),
        );

        let mut ignored = Vec::new();
        // Negative budgets mean no pages at all.
        let pages = parse_or(
            &mut ignored,
            "PAGES",
            get("PAGES"),
            i64::from(DEFAULT_PAGES),
            |_| true,
        );
        let pages = u32::try_from(pages.max(0)).unwrap_or(u32::MAX);
        let delay_seconds = parse_or(&mut ignored, "DELAY", get("DELAY"), 0.0, |d: &f64| {
            d.is_finite() && *d >= 0.0
        });
        let timeout_seconds = parse_or(
            &mut ignored,
            "TIMEOUT",
            get("TIMEOUT"),
            DEFAULT_TIMEOUT_SECS,
            |t| *t > 0,
        );

        Ok(Self {
            api_key,
            cx,
            endpoint: get("API_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            out_dir: PathBuf::from(get("OUT_DIR").unwrap_or_else(|| DEFAULT_OUT_DIR.to_owned())),
            manifest_dir,
            log_file,
            user_agent: get("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            queries: get("QUERIES")
                .map(|raw| parse_queries(&raw))
                .unwrap_or_else(|| vec![DEFAULT_QUERY.to_owned()]),
            pages,
            delay_seconds,
            timeout_seconds,
            ignored,
        })
    }

    /// Search client settings derived from this configuration.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            endpoint: self.endpoint.clone(),
            pages: self.pages,
            page_delay_seconds: self.delay_seconds,
            timeout_seconds: SEARCH_TIMEOUT_SECS,
            ..SearchConfig::new(self.api_key.clone(), self.cx.clone())
        }
    }

    /// Downloader settings derived from this configuration.
    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            out_dir: self.out_dir.clone(),
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent.clone(),
        }
    }
}

// Omits the API key.
impl fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderConfig")
            .field("cx", &self.cx)
            .field("endpoint", &self.endpoint)
            .field("out_dir", &self.out_dir)
            .field("manifest_dir", &self.manifest_dir)
            .field("log_file", &self.log_file)
            .field("user_agent", &self.user_agent)
            .field("queries", &self.queries)
            .field("pages", &self.pages)
            .field("delay_seconds", &self.delay_seconds)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}

/// Parse a `QUERIES` value: a JSON array of strings, or a comma-separated list.
///
/// A value that looks like a JSON array but does not parse is treated as a
/// comma-separated list. Blank entries are dropped.
pub fn parse_queries(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return vec![DEFAULT_QUERY.to_owned()];
    }

    if raw.starts_with('[') {
        if let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(raw) {
            return values
                .into_iter()
                .map(|value| match value {
                    serde_json::Value::String(s) => s.trim().to_owned(),
                    other => other.to_string(),
                })
                .filter(|q| !q.is_empty())
                .collect();
        }
    }

    raw.split(',')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_owned)
        .collect()
}

fn resolve_log_file(manifest_dir: &Path, log_file: &str) -> PathBuf {
    let path = PathBuf::from(log_file);
    if path.is_absolute() {
        path
    } else {
        manifest_dir.join(path)
    }
}

fn parse_or<T, V>(
    ignored: &mut Vec<String>,
    key: &str,
    raw: Option<String>,
    default: T,
    valid: V,
) -> T
where
    T: std::str::FromStr + Copy,
    V: Fn(&T) -> bool,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            ignored.push(format!("{key}={raw}"));
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<FinderConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        FinderConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_applied_with_only_credentials() {
        let config = load(&[("API_KEY", "k"), ("CX", "c")]).expect("config");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.cx, "c");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.out_dir, PathBuf::from("pdf_downloads"));
        assert_eq!(config.manifest_dir, PathBuf::from("manifests"));
        assert_eq!(config.log_file, PathBuf::from("manifests").join("pdf_finder.log"));
        assert_eq!(config.user_agent, "pdf-finder/1.0");
        assert_eq!(config.queries, vec![DEFAULT_QUERY.to_owned()]);
        assert_eq!(config.pages, 10);
        assert!(config.delay_seconds.abs() < f64::EPSILON);
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = load(&[("CX", "c")]).unwrap_err();
        assert!(matches!(err, FinderError::Config(_)));
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn blank_cx_is_fatal() {
        let err = load(&[("API_KEY", "k"), ("CX", "   ")]).unwrap_err();
        assert!(matches!(err, FinderError::Config(_)));
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = load(&[
            ("API_KEY", " k "),
            ("CX", "c"),
            ("API_ENDPOINT", " http://localhost:9000/search "),
            ("OUT_DIR", "out"),
            ("MANIFEST_DIR", "meta"),
            ("USER_AGENT", "bot/2"),
            ("PAGES", " 3 "),
            ("DELAY", "0.5"),
            ("TIMEOUT", "15"),
        ])
        .expect("config");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.endpoint, "http://localhost:9000/search");
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.log_file, PathBuf::from("meta").join("pdf_finder.log"));
        assert_eq!(config.user_agent, "bot/2");
        assert_eq!(config.pages, 3);
        assert!((config.delay_seconds - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.timeout_seconds, 15);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = load(&[
            ("API_KEY", "k"),
            ("CX", "c"),
            ("PAGES", "many"),
            ("DELAY", "-2"),
            ("TIMEOUT", "0"),
        ])
        .expect("config");
        assert_eq!(config.pages, 10);
        assert!(config.delay_seconds.abs() < f64::EPSILON);
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.ignored, vec!["PAGES=many", "DELAY=-2", "TIMEOUT=0"]);
    }

    #[test]
    fn negative_pages_mean_no_pages() {
        let config = load(&[("API_KEY", "k"), ("CX", "c"), ("PAGES", "-1")]).expect("config");
        assert_eq!(config.pages, 0);
        assert!(config.ignored.is_empty());
        assert_eq!(config.search_config().pages, 0);
    }

    #[test]
    fn absolute_log_file_kept() {
        let abs = std::env::temp_dir().join("finder.log");
        let config = load(&[
            ("API_KEY", "k"),
            ("CX", "c"),
            ("LOG_FILE", abs.to_str().unwrap_or_default()),
        ])
        .expect("config");
        assert_eq!(config.log_file, abs);
    }

    #[test]
    fn search_config_uses_fixed_timeout() {
        let config = load(&[("API_KEY", "k"), ("CX", "c"), ("TIMEOUT", "5"), ("PAGES", "2")])
            .expect("config");
        let search = config.search_config();
        assert_eq!(search.api_key, "k");
        assert_eq!(search.cx, "c");
        assert_eq!(search.pages, 2);
        assert_eq!(search.timeout_seconds, SEARCH_TIMEOUT_SECS);
        assert!(search.validate().is_ok());
    }

    #[test]
    fn download_config_carries_timeout_and_agent() {
        let config = load(&[("API_KEY", "k"), ("CX", "c"), ("TIMEOUT", "5"), ("USER_AGENT", "ua/1")])
            .expect("config");
        let download = config.download_config();
        assert_eq!(download.timeout_seconds, 5);
        assert_eq!(download.user_agent, "ua/1");
        assert_eq!(download.out_dir, PathBuf::from("pdf_downloads"));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = load(&[("API_KEY", "super-secret"), ("CX", "c")]).expect("config");
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn queries_from_comma_list() {
        assert_eq!(
            parse_queries(" seo , branding,, personal brand "),
            vec!["seo", "branding", "personal brand"]
        );
    }

    #[test]
    fn queries_from_json_array() {
        assert_eq!(
            parse_queries(r#"["seo, basics", " branding ", "", 42]"#),
            vec!["seo, basics", "branding", "42"]
        );
    }

    #[test]
    fn malformed_json_falls_back_to_commas() {
        assert_eq!(parse_queries(r#"["seo", "branding""#), vec![r#"["seo""#, r#""branding""#]);
    }

    #[test]
    fn blank_queries_use_default() {
        assert_eq!(parse_queries("   "), vec![DEFAULT_QUERY.to_owned()]);
    }
}
