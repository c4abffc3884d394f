// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The backend-family capability record and shared parsing helpers.

use kd_core::StreamFrame;
use serde_json::Value;

/// Final-output parser: consumes the captured stdout/stderr after the child
/// exits and extracts the canonical reply.
pub type ParseResponseFn = fn(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ParsedResponse;

/// Streaming parser: consumes one line of the stream file and returns a
/// normalized frame, or `None` for lines that carry nothing useful.
pub type ExtractFrameFn = fn(line: &str) -> Option<StreamFrame>;

/// Shape of the vendor's streaming output, which decides the stream-file
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    /// One JSON event per line.
    Ndjson,
    /// A single JSON document written incrementally.
    SingleJson,
}

/// What a final parser recovered from a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedResponse {
    /// The canonical reply text (may be empty).
    pub text: String,
    /// Vendor resume token for continuing this conversation.
    pub session_token: Option<String>,
    /// One-line error description when the vendor reported failure.
    pub error: Option<String>,
}

/// One registered backend family. Plain data plus function pointers; the
/// registry is a dispatch table, not a class hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct BackendFamily {
    pub name: &'static str,
    /// Vendor command plus non-negotiable flags (non-interactive, JSON out).
    pub base_argv: &'static [&'static str],
    /// Override when the caller wants token-level streaming.
    pub streaming_base_argv: Option<&'static [&'static str]>,
    /// Leading word of the resume argument pair (`--resume` or a sub-verb),
    /// appended as `<flag> <token>`. `None` means the family cannot resume.
    pub resume_flag: Option<&'static str>,
    /// Argv that prints a version and exits zero.
    pub version_probe: &'static [&'static str],
    /// Remediation string shown when the vendor CLI is unavailable.
    pub install_hint: &'static str,
    pub stream_format: StreamFormat,
    pub parse_response: ParseResponseFn,
    pub extract_stream_frame: ExtractFrameFn,
}

impl BackendFamily {
    /// The argv to start from for a run.
    pub fn argv(&self, streaming: bool) -> &'static [&'static str] {
        if streaming {
            self.streaming_base_argv.unwrap_or(self.base_argv)
        } else {
            self.base_argv
        }
    }

    /// Stream-file extension for this family (without the dot).
    pub fn stream_ext(&self) -> &'static str {
        match self.stream_format {
            StreamFormat::Ndjson => "jsonl",
            StreamFormat::SingleJson => "json",
        }
    }
}

/// Parse captured output into JSON documents.
///
/// Tries a strict one-shot parse first; on failure, splits into lines and
/// parses each as an event, skipping blank and unparsable lines. Never
/// branches on line count, so a single NDJSON event parses either way.
pub fn parse_json_documents(output: &str) -> Vec<Value> {
    if let Ok(doc) = serde_json::from_str::<Value>(output) {
        return vec![doc];
    }
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .collect()
}

/// Last portion of a stderr capture, joined one-line for diagnostics.
pub fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut tail: Vec<&str> = trimmed.lines().rev().take(3).collect();
    tail.reverse();
    let joined = tail.join(" | ");
    if joined.len() > 400 {
        let mut start = joined.len() - 400;
        while !joined.is_char_boundary(start) {
            start += 1;
        }
        joined[start..].to_string()
    } else {
        joined
    }
}

/// One-line diagnostic for a non-zero or signalled exit.
pub(crate) fn exit_error(exit_code: Option<i32>, stderr: &str) -> String {
    let tail = stderr_tail(stderr);
    let prefix = match exit_code {
        Some(code) => format!("exited with code {}", code),
        None => "terminated by signal".to_string(),
    };
    if tail.is_empty() {
        prefix
    } else {
        format!("{}: {}", prefix, tail)
    }
}

/// Unwrap the `{type:"stream_event", event:{...}}` envelope some vendor
/// versions emit; older flat events pass through unchanged.
pub(crate) fn unwrap_stream_envelope(doc: &Value) -> &Value {
    if doc.get("type").and_then(Value::as_str) == Some("stream_event") {
        if let Some(event) = doc.get("event") {
            return event;
        }
    }
    doc
}

#[cfg(test)]
#[path = "family_tests.rs"]
mod tests;
