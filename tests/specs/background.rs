//! Detached worker specs
//!
//! `ask --background` returns immediately; the worker finishes the turn
//! on its own and the thread files are the only channel back.

use crate::prelude::*;

const BACKGROUND_CONFIG: &str = r#"{
    "agents": {"a": {"backend": "claude"}},
    "council": {"members": ["a"], "timeout": 10}
}"#;

/// Claude stub that takes a moment, so the driver provably returns first.
const CLAUDE_SLOWISH_STUB: &str = r#"case "$1" in --version) echo "claude 1.0.0"; exit 0;; esac
sleep 1
echo '{"type":"system","subtype":"init","session_id":"sess-bg"}'
echo '{"type":"content_block_delta","delta":{"type":"text_delta","text":"streamed reply"}}'
echo '{"type":"result","subtype":"success","is_error":false,"result":"streamed reply","session_id":"sess-bg"}'"#;

#[test]
fn background_ask_returns_before_the_reply() {
    let project = Project::empty();
    project.config(BACKGROUND_CONFIG);
    project.stub("claude", CLAUDE_SLOWISH_STUB);

    let thread = project
        .run(&["ask", "hello", "--background"])
        .passes()
        .first_line();

    // The human message is on disk before detach; the reply is not yet.
    assert_eq!(project.message_files(&thread).len(), 1);

    let done = wait_for(SPEC_WAIT_MAX_MS, || {
        project.message_files(&thread).len() >= 2
    });
    assert!(done, "worker never delivered the reply");
    project.run(&["status", &thread]).passes().stdout_has("responded");

    // The scratch stream file is gone once the message landed.
    let leftovers: Vec<_> = std::fs::read_dir(project.thread_dir(&thread))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".stream-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn watch_follows_a_background_run_to_completion() {
    let project = Project::empty();
    project.config(BACKGROUND_CONFIG);
    project.stub("claude", CLAUDE_SLOWISH_STUB);

    let thread = project
        .run(&["ask", "hello", "--background"])
        .passes()
        .first_line();

    project
        .run(&["watch", &thread])
        .passes()
        .stdout_has("streamed reply");
}

#[test]
fn watch_times_out_with_code_124() {
    let project = Project::empty();
    project.config(BACKGROUND_CONFIG);
    project.stub("claude", CLAUDE_SLOWISH_STUB);

    // A turn built by hand: only the human message, and no worker, so
    // nothing will ever complete it.
    let thread = project.threads_dir().join("manual0001");
    std::fs::create_dir_all(&thread).unwrap();
    std::fs::write(
        thread.join("thread.json"),
        r#"{"members":["a"],"phase":"council","created_at":"2026-01-01T00:00:00Z"}"#,
    )
    .unwrap();
    std::fs::write(
        thread.join("0001-king.md"),
        "---\nfrom: king\nto: all\ntimestamp: 2026-01-01T00:00:00Z\n---\n\nhello\n",
    )
    .unwrap();

    project
        .run(&["watch", "manual0001", "--timeout", "1"])
        .exits(124);
}
