//! Small text helpers for the page layer: HTML stripping for list previews
//! and filename sanitization for the write path.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("<[^>]*>").expect("valid pattern"));

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9-_]").expect("valid pattern"));

/// Strip every HTML tag, leaving the text content. Used to turn a rendered
/// body back into a plain-text preview.
pub fn strip_html(s: &str) -> String {
    HTML_TAG.replace_all(s, "").into_owned()
}

const MAX_FILENAME_LEN: usize = 50;

/// Reduce an arbitrary title to a safe object filename: base name only (no
/// directory traversal), lowercase, spaces to dashes, `[a-z0-9-_]` content,
/// at most 50 characters, never empty.
pub fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let lowered = base.to_lowercase().replace(' ', "-");
    let mut cleaned = DISALLOWED.replace_all(&lowered, "").into_owned();
    cleaned.truncate(MAX_FILENAME_LEN);

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '-');
    if trimmed.is_empty() {
        return format!("unnamed-{}", chrono::Utc::now().timestamp());
    }
    trimmed.to_string()
}
