// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "main", "main" },
    slashed = { "feature/council-retry", "feature-council-retry" },
    dotted = { "release-1.2", "release-1.2" },
    empty = { "", "detached" },
)]
fn sanitizes_branch_names(input: &str, expected: &str) {
    assert_eq!(sanitize_branch(input), expected);
}

#[test]
fn layout_nests_under_branch() {
    let layout = StateLayout::new("/tmp/state");
    assert_eq!(
        layout.threads_dir("feature/x"),
        std::path::PathBuf::from("/tmp/state/branches/feature-x/threads")
    );
    assert_eq!(
        layout.sessions_dir("main"),
        std::path::PathBuf::from("/tmp/state/branches/main/sessions")
    );
    assert_eq!(layout.config_path(), std::path::PathBuf::from("/tmp/state/config.json"));
}
