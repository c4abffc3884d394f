//! Retry specs
//!
//! Retry touches only the failed members of the latest turn and is a
//! no-op once everyone has answered.

use crate::prelude::*;

const RETRY_CONFIG: &str = r#"{
    "agents": {
        "a": {"backend": "claude"},
        "b": {"backend": "codex"}
    },
    "council": {"members": ["a", "b"], "timeout": 10}
}"#;

#[test]
fn retry_reruns_only_the_failed_member() {
    let project = Project::empty();
    project.config(RETRY_CONFIG);
    project.stub("claude", CLAUDE_OK_STUB);
    project.stub("codex", CODEX_FAIL_STUB);

    let thread = project.run(&["ask", "hello"]).exits(2).first_line();
    let files = project.message_files(&thread);
    assert_eq!(files.len(), 3, "{:?}", files);
    let b_file = files.iter().find(|f| f.ends_with("-b.md")).unwrap();
    assert!(project.message_body(&thread, b_file).starts_with("*Error:"));

    // The vendor recovers; retry re-asks only `b`.
    project.stub("codex", CODEX_OK_STUB);
    project.run(&["retry", &thread]).passes();

    let files = project.message_files(&thread);
    assert_eq!(files.len(), 4, "one new message: {:?}", files);
    assert_eq!(
        files.iter().filter(|f| f.ends_with("-a.md")).count(),
        1,
        "the healthy member was not re-asked"
    );
    let new_b = files.last().unwrap();
    assert!(new_b.ends_with("-b.md"), "{:?}", files);
    assert!(project.message_body(&thread, new_b).contains("codex recovered"));

    project
        .run(&["status", &thread])
        .passes()
        .stdout_has("responded");
    let status = project.run(&["status", &thread]).passes();
    assert!(!status.stdout.contains("errored"), "{}", status.stdout);
}

#[test]
fn retry_after_full_success_is_a_noop() {
    let project = Project::empty();
    project.config(r#"{
        "agents": {"a": {"backend": "claude"}},
        "council": {"members": ["a"], "timeout": 10}
    }"#);
    project.stub("claude", CLAUDE_OK_STUB);

    let thread = project.run(&["ask", "hello"]).passes().first_line();
    let before = project.message_files(&thread);

    project
        .run(&["retry", &thread])
        .passes()
        .stdout_has("nothing to retry");
    assert_eq!(project.message_files(&thread), before, "no new messages");
}
