// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[test]
fn parses_headers_and_body() {
    let input = "---\nfrom: king\nto: all\n---\n\nHello council\n";
    let fm = Frontmatter::parse(input).unwrap();
    assert_eq!(fm.get("from"), Some("king"));
    assert_eq!(fm.get("to"), Some("all"));
    assert_eq!(fm.body, "Hello council\n");
}

#[test]
fn preserves_unknown_headers() {
    let input = "---\nfrom: king\nx-custom: kept verbatim\n---\n\nbody";
    let fm = Frontmatter::parse(input).unwrap();
    assert_eq!(fm.get("x-custom"), Some("kept verbatim"));
    assert!(fm.render().contains("x-custom: kept verbatim"));
}

#[test]
fn rejects_missing_opening_fence() {
    let err = Frontmatter::parse("from: king\n---\n\nbody").unwrap_err();
    assert_eq!(err, FrontmatterError::MissingOpeningFence);
}

#[test]
fn rejects_unterminated_fence() {
    let err = Frontmatter::parse("---\nfrom: king\n").unwrap_err();
    assert_eq!(err, FrontmatterError::UnterminatedFence);
}

#[test]
fn invalid_header_names_the_line() {
    let err = Frontmatter::parse("---\nfrom: king\nnot a header\n---\n\nbody").unwrap_err();
    assert_eq!(
        err,
        FrontmatterError::InvalidHeader { line: 3, text: "not a header".to_string() }
    );
    assert!(err.to_string().contains("line 3"));
}

#[test]
fn empty_body_round_trips() {
    let mut fm = Frontmatter::new();
    fm.push("from", "king");
    let rendered = fm.render();
    let back = Frontmatter::parse(&rendered).unwrap();
    assert_eq!(back, fm);
}

#[test]
fn body_bytes_are_exact() {
    // Leading blank lines beyond the separator belong to the body.
    let input = "---\nfrom: a\n---\n\n\nsecond line starts after a blank\n";
    let fm = Frontmatter::parse(input).unwrap();
    assert_eq!(fm.body, "\nsecond line starts after a blank\n");
    assert_eq!(fm.render(), input);
}

#[test]
fn header_without_body_separator_still_parses() {
    // A file truncated right after the closing fence has an empty body.
    let fm = Frontmatter::parse("---\nfrom: a\n---\n").unwrap();
    assert_eq!(fm.body, "");
}

#[test]
fn value_may_contain_colons() {
    let fm = Frontmatter::parse("---\ntimestamp: 2026-01-02T03:04:05Z\n---\n\nx").unwrap();
    assert_eq!(fm.get("timestamp"), Some("2026-01-02T03:04:05Z"));
}

fn header_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}"
}

fn header_value() -> impl Strategy<Value = String> {
    // No newlines; no surrounding whitespace (parse trims it away).
    "[a-zA-Z0-9 :,./*-]{0,40}".prop_map(|s| s.trim().to_string())
}

proptest! {
    #[test]
    fn render_parse_round_trip(
        headers in proptest::collection::vec((header_key(), header_value()), 0..8),
        body in "[ -~\n]{0,200}",
    ) {
        let fm = Frontmatter { headers, body };
        let back = Frontmatter::parse(&fm.render()).unwrap();
        prop_assert_eq!(back, fm);
    }
}
