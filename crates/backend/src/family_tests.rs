// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn one_shot_json_parses_as_single_document() {
    let docs = parse_json_documents(r#"{"type":"result","result":"hi"}"#);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["type"], "result");
}

#[test]
fn ndjson_parses_per_line() {
    let docs = parse_json_documents("{\"type\":\"a\"}\n{\"type\":\"b\"}\n");
    assert_eq!(docs.len(), 2);
}

#[test]
fn single_ndjson_event_still_parses() {
    // One event, one line: must work through the one-shot path too.
    let docs = parse_json_documents("{\"type\":\"agent_message\",\"text\":\"x\"}\n");
    assert_eq!(docs.len(), 1);
}

#[test]
fn blank_and_garbage_lines_are_skipped() {
    let docs = parse_json_documents("{\"type\":\"a\"}\n\nnot json\n{\"type\":\"b\"}\n");
    assert_eq!(docs.len(), 2);
}

#[test]
fn stderr_tail_keeps_last_lines() {
    let tail = stderr_tail("one\ntwo\nthree\nfour\nfive\n");
    assert_eq!(tail, "three | four | five");
}

#[test]
fn stderr_tail_empty_input() {
    assert_eq!(stderr_tail(""), "");
    assert_eq!(stderr_tail("\n\n"), "");
}

#[test]
fn stream_ext_follows_format() {
    let family = crate::family("claude").unwrap();
    assert_eq!(family.stream_ext(), "jsonl");
}

#[test]
fn argv_falls_back_to_base_without_streaming_override() {
    let family = crate::family("codex").unwrap();
    assert_eq!(family.argv(true), family.argv(false));
}
