//! Free-text normalization for single-line report fields

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n|\r").expect("line break pattern is valid"));

/// Trim surrounding whitespace and drop every line break
///
/// Applied to access rule documentation and XPath constraints so free text
/// stays on one report row.
pub fn normalize_free_text(text: &str) -> String {
    LINE_BREAKS.replace_all(text.trim(), "").into_owned()
}
