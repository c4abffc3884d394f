// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claude-family CLI contract.
//!
//! Final output is a `result` event; the live stream is NDJSON with
//! `content_block_delta` token frames. Newer CLI versions wrap stream
//! events in a `{type:"stream_event", event:{...}}` envelope and some emit
//! whole `assistant` messages instead of deltas; the extractor accepts
//! all three shapes.

use crate::family::{
    exit_error, parse_json_documents, unwrap_stream_envelope, BackendFamily, ParsedResponse,
    StreamFormat,
};
use kd_core::StreamFrame;
use serde_json::Value;

pub(crate) fn family() -> BackendFamily {
    BackendFamily {
        name: "claude",
        base_argv: &["claude", "-p", "--output-format", "json"],
        streaming_base_argv: Some(&[
            "claude",
            "-p",
            "--output-format",
            "stream-json",
            "--verbose",
        ]),
        resume_flag: Some("--resume"),
        version_probe: &["claude", "--version"],
        install_hint: "install the Claude CLI: npm install -g @anthropic-ai/claude-code",
        stream_format: StreamFormat::Ndjson,
        parse_response,
        extract_stream_frame,
    }
}

fn parse_response(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ParsedResponse {
    let docs = parse_json_documents(stdout);
    let mut text = String::new();
    let mut session_token = None;
    let mut error = None;
    let mut saw_result = false;
    let mut assistant_text = String::new();

    for doc in &docs {
        if let Some(sid) = doc.get("session_id").and_then(Value::as_str) {
            session_token = Some(sid.to_string());
        }
        match doc.get("type").and_then(Value::as_str) {
            Some("result") => {
                saw_result = true;
                if let Some(t) = doc.get("result").and_then(Value::as_str) {
                    text = t.to_string();
                }
                let is_error = doc.get("is_error").and_then(Value::as_bool).unwrap_or(false);
                let subtype = doc.get("subtype").and_then(Value::as_str).unwrap_or("success");
                if is_error || subtype != "success" {
                    let detail = text.lines().next().unwrap_or(subtype);
                    error = Some(format!("agent reported {}: {}", subtype, detail));
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

    // Streams cut short of the result event still yield the partial reply.
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
            let mut text = String::new();
            let mut thinking = String::new();
            for block in blocks {
                match block.get("type").and_then(Value::as_str) {
                    Some("text") => {
                        text.push_str(block.get("text").and_then(Value::as_str).unwrap_or(""));
                    }
                    Some("thinking") => {
                        thinking
                            .push_str(block.get("thinking").and_then(Value::as_str).unwrap_or(""));
                    }
                    _ => {}
                }
            }
            if !text.is_empty() {
                Some(StreamFrame::Token { text })
            } else if !thinking.is_empty() {
                Some(StreamFrame::Thinking { text: thinking })
            } else {
                None
            }
        }
        "system" => {
            if let Some(sid) = event.get("session_id").and_then(Value::as_str) {
                Some(StreamFrame::Session { token: sid.to_string() })
            } else {
                let subtype = event.get("subtype").and_then(Value::as_str).unwrap_or("system");
                Some(StreamFrame::Status { phase: subtype.to_string() })
            }
        }
        "result" => {
            if event.get("is_error").and_then(Value::as_bool).unwrap_or(false) {
                let message = event
                    .get("result")
                    .and_then(Value::as_str)
                    .unwrap_or("agent reported an error")
                    .to_string();
                Some(StreamFrame::Error { message })
            } else {
                Some(StreamFrame::Status { phase: "result".to_string() })
            }
        }
        "error" => Some(StreamFrame::Error {
            message: event
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
