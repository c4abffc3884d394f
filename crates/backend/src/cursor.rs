// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cursor-family CLI contract.
//!
//! Today this resembles the Claude shape (NDJSON stream, delta frames,
//! terminal `result` event) but the vendor versions independently: the
//! session key is `chat_id` on current builds and the final text has moved
//! between `result` and `response`. Kept as its own record so drift here
//! never leaks into the Claude parser.

use crate::family::{
    exit_error, parse_json_documents, unwrap_stream_envelope, BackendFamily, ParsedResponse,
    StreamFormat,
};
use kd_core::StreamFrame;
use serde_json::Value;

pub(crate) fn family() -> BackendFamily {
    BackendFamily {
        name: "cursor",
        base_argv: &["cursor-agent", "-p", "--output-format", "json"],
        streaming_base_argv: Some(&["cursor-agent", "-p", "--output-format", "stream-json"]),
        resume_flag: Some("--resume"),
        version_probe: &["cursor-agent", "--version"],
        install_hint: "install the Cursor CLI: curl https://cursor.com/install -fsS | bash",
        stream_format: StreamFormat::Ndjson,
        parse_response,
        extract_stream_frame,
    }
}

fn session_of(doc: &Value) -> Option<String> {
    doc.get("chat_id")
        .or_else(|| doc.get("session_id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn parse_response(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ParsedResponse {
    let docs = parse_json_documents(stdout);
    let mut text = String::new();
    let mut session_token = None;
    let mut error = None;
    let mut saw_result = false;
    let mut assistant_text = String::new();

    for doc in &docs {
        if let Some(sid) = session_of(doc) {
            session_token = Some(sid);
        }
        match doc.get("type").and_then(Value::as_str) {
            Some("result") => {
                saw_result = true;
                if let Some(t) = doc
                    .get("result")
                    .or_else(|| doc.get("response"))
                    .and_then(Value::as_str)
                {
                    text = t.to_string();
                }
                if doc.get("is_error").and_then(Value::as_bool).unwrap_or(false) {
                    let detail = text.lines().next().unwrap_or("agent reported an error");
                    error = Some(detail.to_string());
                }
            }
            Some("assistant") => {
                if let Some(blocks) = doc
                    .get("message")
                    .and_then(|m| m.get("content"))
                    .and_then(Value::as_array)
                {
                    for block in blocks {
                        if block.get("type").and_then(Value::as_str) == Some("text") {
                            if let Some(t) = block.get("text").and_then(Value::as_str) {
                                assistant_text.push_str(t);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if !saw_result {
        text = assistant_text;
    }
    if error.is_none() && exit_code != Some(0) {
        error = Some(exit_error(exit_code, stderr));
    }
    ParsedResponse { text, session_token, error }
}

fn extract_stream_frame(line: &str) -> Option<StreamFrame> {
    let doc: Value = serde_json::from_str(line.trim()).ok()?;
    let event = unwrap_stream_envelope(&doc);
    match event.get("type")?.as_str()? {
        "content_block_delta" => {
            let delta = event.get("delta")?;
            match delta.get("type").and_then(Value::as_str) {
                Some("text_delta") => Some(StreamFrame::Token {
                    text: delta.get("text")?.as_str()?.to_string(),
                }),
                Some("thinking_delta") => Some(StreamFrame::Thinking {
                    text: delta.get("thinking")?.as_str()?.to_string(),
                }),
                _ => None,
            }
        }
        "assistant" => {
            let blocks = event.get("message")?.get("content")?.as_array()?;
            let text: String = blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            if text.is_empty() {
                None
            } else {
                Some(StreamFrame::Token { text })
            }
        }
        "system" => session_of(event)
            .map(|token| StreamFrame::Session { token })
            .or_else(|| {
                let subtype = event.get("subtype").and_then(Value::as_str)?;
                Some(StreamFrame::Status { phase: subtype.to_string() })
            }),
        "result" => {
            if event.get("is_error").and_then(Value::as_bool).unwrap_or(false) {
                Some(StreamFrame::Error {
                    message: event
                        .get("result")
                        .or_else(|| event.get("response"))
                        .and_then(Value::as_str)
                        .unwrap_or("agent reported an error")
                        .to_string(),
                })
            } else {
                Some(StreamFrame::Status { phase: "result".to_string() })
            }
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
