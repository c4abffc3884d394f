// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fakes for council tests: agents whose "vendor CLI" is a shell
//! one-liner, so runs are real subprocesses without any vendor installed.

use crate::agent_config::AgentConfig;
use kd_backend::{BackendFamily, ParsedResponse, StreamFormat};

/// Final parser for shell stubs: the reply is trimmed stdout, a non-zero
/// exit is an error.
pub(crate) fn echo_parse(stdout: &str, _stderr: &str, exit_code: Option<i32>) -> ParsedResponse {
    ParsedResponse {
        text: stdout.trim().to_string(),
        session_token: None,
        error: match exit_code {
            Some(0) => None,
            other => Some(format!("exit {:?}", other)),
        },
    }
}

/// Like [`echo_parse`] but also reports a fixed session token.
pub(crate) fn session_parse(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ParsedResponse {
    let mut parsed = echo_parse(stdout, stderr, exit_code);
    parsed.session_token = Some("tok-fixed".to_string());
    parsed
}

pub(crate) fn no_frame(_line: &str) -> Option<kd_core::StreamFrame> {
    None
}

pub(crate) fn leak_argv(argv: Vec<String>) -> &'static [&'static str] {
    let leaked: Vec<&'static str> = argv
        .into_iter()
        .map(|s| &*Box::leak(s.into_boxed_str()))
        .collect();
    Box::leak(leaked.into_boxed_slice())
}

/// An agent backed by `sh -c <script>`. The composed prompt arrives as
/// `$0` and is ignored by the scripts.
pub(crate) fn shell_agent(name: &str, script: &str) -> AgentConfig {
    AgentConfig {
        name: name.to_string(),
        family: BackendFamily {
            name: "fake-sh",
            base_argv: leak_argv(vec!["sh".to_string(), "-c".to_string(), script.to_string()]),
            streaming_base_argv: None,
            resume_flag: None,
            version_probe: &["true"],
            install_hint: "install a shell",
            stream_format: StreamFormat::Ndjson,
            parse_response: echo_parse,
            extract_stream_frame: no_frame,
        },
        model: None,
        persona: None,
        extra_args: Vec::new(),
    }
}
