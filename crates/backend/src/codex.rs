// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codex-family CLI contract.
//!
//! Always NDJSON, streaming or not. The terminal frame is an
//! `agent_message` item; newer versions wrap items in
//! `{type:"item.completed", item:{...}}`, older ones emit the flat
//! `{type:"agent_message"}` event. The thread id doubles as the resume
//! token and resume is a sub-verb, not a flag.

use crate::family::{
    exit_error, parse_json_documents, unwrap_stream_envelope, BackendFamily, ParsedResponse,
    StreamFormat,
};
use kd_core::StreamFrame;
use serde_json::Value;

pub(crate) fn family() -> BackendFamily {
    BackendFamily {
        name: "codex",
        base_argv: &["codex", "exec", "--json"],
        streaming_base_argv: None,
        resume_flag: Some("resume"),
        version_probe: &["codex", "--version"],
        install_hint: "install the Codex CLI: npm install -g @openai/codex",
        stream_format: StreamFormat::Ndjson,
        parse_response,
        extract_stream_frame,
    }
}

/// Text of an `agent_message` item, from either the wrapped or flat shape.
fn agent_message_text(doc: &Value) -> Option<String> {
    match doc.get("type").and_then(Value::as_str) {
        Some("item.completed") => {
            let item = doc.get("item")?;
            if item.get("type").and_then(Value::as_str) == Some("agent_message")
                || item.get("item_type").and_then(Value::as_str) == Some("agent_message")
            {
                item.get("text").and_then(Value::as_str).map(str::to_string)
            } else {
                None
            }
        }
        Some("agent_message") => doc
            .get("text")
            .or_else(|| doc.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn parse_response(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ParsedResponse {
    let docs = parse_json_documents(stdout);
    let mut text = String::new();
    let mut session_token = None;
    let mut error = None;

    for doc in &docs {
        if let Some(tid) = doc.get("thread_id").and_then(Value::as_str) {
            session_token = Some(tid.to_string());
        }
        if let Some(message) = agent_message_text(doc) {
            // The last agent message of the turn is the canonical reply.
            text = message;
        }
        if doc.get("type").and_then(Value::as_str) == Some("error") {
            let message = doc
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            error = Some(message.to_string());
        }
    }

    if error.is_none() && exit_code != Some(0) {
        error = Some(exit_error(exit_code, stderr));
    }
    ParsedResponse { text, session_token, error }
}

fn extract_stream_frame(line: &str) -> Option<StreamFrame> {
    let doc: Value = serde_json::from_str(line.trim()).ok()?;
    let event = unwrap_stream_envelope(&doc);
    if let Some(text) = agent_message_text(event) {
        return Some(StreamFrame::Token { text });
    }
    match event.get("type")?.as_str()? {
        "thread.started" => {
            let tid = event.get("thread_id").and_then(Value::as_str)?;
            Some(StreamFrame::Session { token: tid.to_string() })
        }
        "turn.started" | "turn.completed" => Some(StreamFrame::Status {
            phase: event.get("type").and_then(Value::as_str)?.to_string(),
        }),
        "item.completed" => {
            let item = event.get("item")?;
            match item.get("type").and_then(Value::as_str) {
                Some("reasoning") => Some(StreamFrame::Thinking {
                    text: item.get("text").and_then(Value::as_str)?.to_string(),
                }),
                Some(other) => Some(StreamFrame::Status { phase: other.to_string() }),
                None => None,
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
#[path = "codex_tests.rs"]
mod tests;
