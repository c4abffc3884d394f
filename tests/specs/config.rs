//! Config validation specs
//!
//! Every command that loads config must reject unknown keys with the
//! full dotted path and exit 1, with a single-line diagnostic and never a
//! backtrace.

use crate::prelude::*;

#[test]
fn unknown_key_is_rejected_with_dotted_path() {
    let project = Project::empty();
    project.config(r#"{"council": {"timout": 600}}"#);

    for args in [&["status"][..], &["list"][..], &["ask", "hello"][..]] {
        project
            .run(args)
            .exits(1)
            .stderr_has("council.timout");
    }

    // No partial state was created along the way.
    assert!(
        !project.threads_dir().exists()
            || std::fs::read_dir(project.threads_dir()).unwrap().count() == 0
    );
}

#[test]
fn config_diagnostic_is_single_line() {
    let project = Project::empty();
    project.config(r#"{"council": {"timout": 600}}"#);
    let result = project.run(&["status"]).exits(1);
    let diagnostic_lines = result
        .stderr
        .lines()
        .filter(|l| l.contains("config"))
        .count();
    assert_eq!(diagnostic_lines, 1, "{}", result.stderr);
    assert!(!result.stderr.contains("panic"), "{}", result.stderr);
}

#[test]
fn missing_config_is_the_empty_default() {
    let project = Project::empty();
    project.run(&["list"]).passes().stdout_has("no threads");
    // Asking without any configured members is a user error, not a crash.
    project
        .run(&["ask", "hello"])
        .exits(1)
        .stderr_has("no council members");
}

#[test]
fn cross_references_must_resolve() {
    let project = Project::empty();
    project.config(
        r#"{"agents": {"a": {"backend": "claude"}},
            "council": {"members": ["a", "ghost"]}}"#,
    );
    project.run(&["status"]).exits(1).stderr_has("ghost");
}

#[test]
fn unregistered_backend_family_is_rejected() {
    let project = Project::empty();
    project.config(r#"{"agents": {"a": {"backend": "gemini"}}}"#);
    project.run(&["list"]).exits(1).stderr_has("gemini");
}
