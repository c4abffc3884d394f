//! Council ask specs
//!
//! Mixed-outcome turns, thread file layout, status derivation, and
//! session bookkeeping, all through the real binary and stub vendors.

use crate::prelude::*;

const SINGLE_MEMBER_CONFIG: &str = r#"{
    "agents": {"a": {"backend": "claude"}},
    "council": {"members": ["a"], "timeout": 10}
}"#;

#[test]
fn one_succeeds_one_times_out() {
    let project = Project::empty();
    project.config(TWO_MEMBER_CONFIG);
    project.stub("claude", CLAUDE_OK_STUB);
    project.stub("codex", CODEX_SLEEP_STUB);

    // A failed member surfaces as exit 2; the thread stays complete.
    let result = project.run(&["ask", "hello council"]).exits(2);
    let thread = result.first_line();
    assert!(!thread.is_empty(), "thread id printed first");

    let files = project.message_files(&thread);
    assert_eq!(files.len(), 3, "human message plus one reply each: {:?}", files);
    assert_eq!(files[0], "0001-king.md");
    assert!(files[1..].iter().any(|f| f.ends_with("-a.md")), "{:?}", files);
    assert!(files[1..].iter().any(|f| f.ends_with("-b.md")), "{:?}", files);

    let b_file = files.iter().find(|f| f.ends_with("-b.md")).unwrap();
    let b_body = project.message_body(&thread, b_file);
    assert!(b_body.starts_with("*Timeout:"), "{}", b_body);

    project
        .run(&["status", &thread])
        .passes()
        .stdout_has("responded")
        .stdout_has("timed_out");
}

#[test]
fn all_members_respond_exit_zero() {
    let project = Project::empty();
    project.config(SINGLE_MEMBER_CONFIG);
    project.stub("claude", CLAUDE_OK_STUB);

    let result = project.run(&["ask", "hello"]).passes();
    let thread = result.first_line();

    project
        .run(&["show", &thread])
        .passes()
        .stdout_has("hello")
        .stdout_has("stub says hi");
    project.run(&["list"]).passes().stdout_has(&thread);
    project.run(&["status", &thread]).passes().stdout_has("responded");
}

#[test]
fn session_token_is_captured_and_resettable() {
    let project = Project::empty();
    project.config(SINGLE_MEMBER_CONFIG);
    project.stub("claude", CLAUDE_OK_STUB);

    project.run(&["ask", "hello"]).passes();
    project
        .run(&["session", "show", "a"])
        .passes()
        .stdout_has("sess-stub");

    project.run(&["session", "reset", "a"]).passes();
    project
        .run(&["session", "show", "a"])
        .passes()
        .stdout_has("no session");
}

#[test]
fn member_subset_limits_the_turn() {
    let project = Project::empty();
    project.config(TWO_MEMBER_CONFIG);
    project.stub("claude", CLAUDE_OK_STUB);
    project.stub("codex", CODEX_SLEEP_STUB);

    // Only the healthy member is asked; nothing times out.
    let result = project.run(&["ask", "hello", "--member", "a"]).passes();
    let thread = result.first_line();

    let files = project.message_files(&thread);
    assert_eq!(files.len(), 2, "{:?}", files);
    let status = project.run(&["status", &thread]).passes();
    assert!(!status.stdout.contains("timed_out"), "{}", status.stdout);
}

#[test]
fn archive_removes_thread_from_listing() {
    let project = Project::empty();
    project.config(SINGLE_MEMBER_CONFIG);
    project.stub("claude", CLAUDE_OK_STUB);

    let thread = project.run(&["ask", "hello"]).passes().first_line();
    project.run(&["archive", &thread]).passes();
    let listing = project.run(&["list"]).passes();
    assert!(!listing.stdout.contains(&thread), "{}", listing.stdout);
}
