//! Candidate classification and host-relative normalisation.
//!
//! Rules are evaluated in the order of [`RULES`]; the first one whose
//! predicate matches decides the outcome, even when that outcome is to drop
//! the candidate.

use crate::model::{ClassifiedUrl, ClassifiedUrls, UrlKind};
use tracing::debug;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const FILE_EXTENSIONS: [&str; 4] = ["csv", "pdf", "txt", "xlm"];

fn has_extension(url: &str, extensions: &[&str]) -> bool {
    url.rsplit_once('.')
        .map(|(_, ext)| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Case-insensitive `.png`, `.jpg` or `.jpeg` suffix.
pub fn is_image_url(url: &str) -> bool {
    has_extension(url, &IMAGE_EXTENSIONS)
}

/// Case-insensitive `.csv`, `.pdf`, `.txt` or `.xlm` suffix.
pub fn is_file_url(url: &str) -> bool {
    has_extension(url, &FILE_EXTENSIONS)
}

fn has_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `.js` / `.css` assets, discarded.
    Asset,
    /// Starts with `http://` or `https://`.
    Absolute,
    /// Starts with `/`.
    HostRelative,
    /// Bare `.html` / `.htm` name.
    BareDocument,
    /// Bare `.png` / `.jpg` / `.jpeg` name.
    BareImage,
}

pub const RULES: [Rule; 5] = [
    Rule::Asset,
    Rule::Absolute,
    Rule::HostRelative,
    Rule::BareDocument,
    Rule::BareImage,
];

impl Rule {
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Rule::Asset => candidate.ends_with(".js") || candidate.ends_with(".css"),
            Rule::Absolute => has_scheme(candidate),
            Rule::HostRelative => candidate.starts_with('/'),
            Rule::BareDocument => candidate.ends_with(".html") || candidate.ends_with(".htm"),
            Rule::BareImage => {
                candidate.ends_with(".png")
                    || candidate.ends_with(".jpg")
                    || candidate.ends_with(".jpeg")
            }
        }
    }

    /// Build the classified URL for a candidate this rule matched.
    /// `None` means the candidate is dropped.
    pub fn apply(&self, candidate: &str, host: &str) -> Option<ClassifiedUrl> {
        match self {
            Rule::Asset => None,
            Rule::Absolute => {
                let kind = if is_image_url(candidate) {
                    UrlKind::ExternalImage
                } else {
                    UrlKind::ExternalPage
                };
                Some(ClassifiedUrl {
                    value: candidate.to_string(),
                    kind,
                    resolved: false,
                })
            }
            Rule::HostRelative => {
                let kind = if is_image_url(candidate) {
                    UrlKind::LocalImage
                } else if is_file_url(candidate) {
                    UrlKind::LocalFile
                } else {
                    UrlKind::LocalPage
                };
                // NOTE: intentionally schemeless. The result is `host/path`,
                // not a full URL; callers that fetch it must pick a scheme.
                Some(ClassifiedUrl {
                    value: format!("{}{}", host, candidate),
                    kind,
                    resolved: true,
                })
            }
            Rule::BareDocument => {
                // NOTE: the fixed `people.html` segment is part of the rule as
                // observed in production output. It is not derived from the
                // page and is kept as-is.
                let value = if candidate.starts_with('/') {
                    format!("https://{}/people.html{}", host, candidate)
                } else {
                    format!("https://{}/people.html/{}", host, candidate)
                };
                Some(ClassifiedUrl {
                    value,
                    kind: UrlKind::LocalPage,
                    resolved: true,
                })
            }
            Rule::BareImage => {
                let value = if candidate.starts_with('/') {
                    format!("https://{}{}", host, candidate)
                } else {
                    format!("https://{}/{}", host, candidate)
                };
                Some(ClassifiedUrl {
                    value,
                    kind: UrlKind::LocalImage,
                    resolved: true,
                })
            }
        }
    }
}

/// The first rule whose predicate matches `candidate`.
pub fn matching_rule(candidate: &str) -> Option<Rule> {
    RULES.iter().copied().find(|rule| rule.matches(candidate))
}

pub fn classify_candidate(candidate: &str, host: &str) -> Option<ClassifiedUrl> {
    matching_rule(candidate).and_then(|rule| rule.apply(candidate, host))
}

/// Classify filtered candidates against `host`, keeping input order within
/// each bucket.
pub fn classify_candidates<S: AsRef<str>>(candidates: &[S], host: &str) -> ClassifiedUrls {
    let mut buckets = ClassifiedUrls::default();
    for candidate in candidates {
        let candidate = candidate.as_ref();
        match classify_candidate(candidate, host) {
            Some(url) => {
                debug!("{} -> {} ({})", candidate, url.value, url.kind.as_str());
                buckets.push(url);
            }
            None => debug!("{} dropped", candidate),
        }
    }
    buckets
}
