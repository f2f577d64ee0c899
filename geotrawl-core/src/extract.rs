//! Pulls URL-shaped strings out of raw page text.
//!
//! This deliberately works on the text, not on a DOM: every double-quoted
//! run is a candidate, including attribute values that are not URLs at all.
//! [`filter_candidates`] is the only gate that keeps that noise out of
//! classification.

use regex::Regex;
use std::sync::LazyLock;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

/// Suffixes that mark a schemeless, non-rooted candidate as worth keeping.
const KEPT_SUFFIXES: [&str; 4] = [".html", ".png", ".jpeg", ".jpg"];

/// Every quoted substring in `text`, quotes stripped, in order of appearance.
/// Duplicates are kept.
pub fn extract_quoted(text: &str) -> Vec<String> {
    QUOTED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_candidate_url(item: &str) -> bool {
    if item.starts_with("http://") || item.starts_with("https://") {
        return true;
    }
    item.starts_with('/') || KEPT_SUFFIXES.iter().any(|ext| item.ends_with(ext))
}

pub fn filter_candidates(candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|c| is_candidate_url(c))
        .collect()
}

/// Extraction and filtering in one pass.
pub fn extract_candidates(html: &str) -> Vec<String> {
    filter_candidates(extract_quoted(html))
}
