//! Filename derivation for downloaded documents.
//!
//! Titles from search results become file names: anything outside word
//! characters, whitespace, `-`, `.`, `(` and `)` is removed, whitespace runs
//! collapse to a single space, and the result is capped at
//! [`MAX_FILENAME_CHARS`] characters.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a sanitised name, in characters.
pub const MAX_FILENAME_CHARS: usize = 150;

/// Name used when neither the title nor the URL yields anything usable.
pub const FALLBACK_NAME: &str = "document";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-.()]+").expect("literal pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("literal pattern"));

/// Sanitise `name` for use as a file name stem.
///
/// May return an empty string. Idempotent: sanitising an already
/// sanitised name returns it unchanged.
pub fn sanitize_filename(name: &str) -> String {
    let stripped = DISALLOWED.replace_all(name, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let truncated: String = collapsed.trim().chars().take(MAX_FILENAME_CHARS).collect();
    // Truncation can land right after a space.
    truncated.trim_end().to_owned()
}

/// Derive a name stem from the last path segment of `url`.
///
/// The `.pdf` extension is removed before sanitising. Returns an empty
/// string if the URL does not parse or has no final path segment.
pub fn filename_from_url(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return String::new();
    };
    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    sanitize_filename(&segment.replace(".pdf", ""))
}

/// Pick the file name stem for a download: the sanitised title, else a
/// name derived from the URL, else [`FALLBACK_NAME`].
pub fn derive_base_name(url: &str, title_hint: &str) -> String {
    let from_title = sanitize_filename(title_hint);
    if !from_title.is_empty() {
        return from_title;
    }
    let from_url = filename_from_url(url);
    if !from_url.is_empty() {
        return from_url;
    }
    FALLBACK_NAME.to_owned()
}
