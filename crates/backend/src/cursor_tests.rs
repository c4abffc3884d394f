// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn final_parse_reads_chat_id_session() {
    let out = r#"{"type":"result","is_error":false,"result":"done","chat_id":"chat-7"}"#;
    let parsed = parse_response(out, "", Some(0));
    assert_eq!(parsed.text, "done");
    assert_eq!(parsed.session_token.as_deref(), Some("chat-7"));
}

#[test]
fn final_parse_accepts_response_field() {
    let out = r#"{"type":"result","is_error":false,"response":"moved field"}"#;
    let parsed = parse_response(out, "", Some(0));
    assert_eq!(parsed.text, "moved field");
}

#[test]
fn stream_token_delta() {
    let line = r#"{"type":"content_block_delta","delta":{"type":"text_delta","text":"cur"}}"#;
    assert_eq!(
        extract_stream_frame(line),
        Some(kd_core::StreamFrame::Token { text: "cur".to_string() })
    );
}

#[test]
fn enveloped_events_unwrap() {
    let line = r#"{"type":"stream_event","event":{"type":"system","subtype":"init","chat_id":"chat-3"}}"#;
    assert_eq!(
        extract_stream_frame(line),
        Some(kd_core::StreamFrame::Session { token: "chat-3".to_string() })
    );
}

#[test]
fn error_result_frame() {
    let line = r#"{"type":"result","is_error":true,"result":"login required"}"#;
    assert_eq!(
        extract_stream_frame(line),
        Some(kd_core::StreamFrame::Error { message: "login required".to_string() })
    );
}
