//! Plain-text summary derivation from markdown-ish body text.
//!
//! # Responsibility
//! - Strip markdown decoration and collapse whitespace into a one-line
//!   summary, capped in length.
//!
//! # Invariants
//! - Derivation is deterministic; same input, same summary.

use once_cell::sync::Lazy;
use regex::Regex;

/// Length cap applied to derived summaries.
pub const SUMMARY_MAX_CHARS: usize = 150;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Derives a one-line plain-text summary from body text.
///
/// Rules:
/// - Markdown images are dropped, links reduced to their label.
/// - Remaining markdown symbols are removed, whitespace normalized.
/// - The first 150 chars are retained; empty input yields `None`.
pub fn derive_text_summary(body: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(body, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(SUMMARY_MAX_CHARS).collect())
    }
}
