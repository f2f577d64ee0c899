// Tests for candidate extraction

use geotrawl_core::extract::{extract_candidates, extract_quoted, filter_candidates, is_candidate_url};

// ============================================================================
// Quoted Run Extraction Tests
// ============================================================================

#[test]
fn test_extract_quoted_in_order() {
    let html = r#"<a href="/about.html" class="nav">About</a><img src="https://cdn.example/a.png">"#;
    let quoted = extract_quoted(html);
    assert_eq!(
        quoted,
        vec!["/about.html", "nav", "https://cdn.example/a.png"]
    );
}

#[test]
fn test_extract_quoted_keeps_duplicates() {
    let html = r#"<img src="/a.jpg"><img src="/a.jpg">"#;
    assert_eq!(extract_quoted(html), vec!["/a.jpg", "/a.jpg"]);
}

#[test]
fn test_extract_quoted_empty_value() {
    let html = r#"<div id="" title="x"></div>"#;
    assert_eq!(extract_quoted(html), vec!["", "x"]);
}

#[test]
fn test_extract_quoted_unbalanced_quote_ignored() {
    let html = r#"<p title="open>text"#;
    assert!(extract_quoted(html).is_empty());
}

#[test]
fn test_extract_quoted_spans_lines() {
    let html = "<a href=\"/multi\nline.html\">";
    assert_eq!(extract_quoted(html), vec!["/multi\nline.html"]);
}

#[test]
fn test_extract_quoted_no_quotes() {
    assert!(extract_quoted("<html><body>plain</body></html>").is_empty());
}

// ============================================================================
// Filter Tests
// ============================================================================

#[test]
fn test_filter_keeps_schemes() {
    assert!(is_candidate_url("http://example.com"));
    assert!(is_candidate_url("https://example.com/x"));
}

#[test]
fn test_filter_keeps_rooted_paths() {
    assert!(is_candidate_url("/"));
    assert!(is_candidate_url("/static/app.js"));
}

#[test]
fn test_filter_keeps_known_suffixes() {
    assert!(is_candidate_url("people.html"));
    assert!(is_candidate_url("img/logo.png"));
    assert!(is_candidate_url("photo.jpeg"));
    assert!(is_candidate_url("photo.jpg"));
}

#[test]
fn test_filter_drops_noise() {
    assert!(!is_candidate_url("nav"));
    assert!(!is_candidate_url(""));
    assert!(!is_candidate_url("text/javascript"));
    assert!(!is_candidate_url("ftp://example.com/file.txt"));
    // suffix match is case-sensitive at this stage
    assert!(!is_candidate_url("PHOTO.JPG"));
}

#[test]
fn test_filter_candidates_preserves_order() {
    let candidates = vec![
        "nav".to_string(),
        "/b".to_string(),
        "a.png".to_string(),
        "utf-8".to_string(),
        "https://x.example".to_string(),
    ];
    assert_eq!(
        filter_candidates(candidates),
        vec!["/b", "a.png", "https://x.example"]
    );
}

#[test]
fn test_extract_candidates_from_page() {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <link rel="stylesheet" href="/css/site.css">
  <script src="https://cdn.example/lib.js"></script>
</head>
<body>
  <img src="/img/photo.jpg" alt="A photo">
  <a href="contact.html">Contact</a>
</body>
</html>"#;

    assert_eq!(
        extract_candidates(html),
        vec![
            "/css/site.css",
            "https://cdn.example/lib.js",
            "/img/photo.jpg",
            "contact.html",
        ]
    );
}
