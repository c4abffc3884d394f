// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn workdir_is_the_state_dirs_parent() {
    assert_eq!(
        workdir_or_root(Path::new("/repo/.kingdom")),
        std::path::PathBuf::from("/repo")
    );
}

#[test]
fn worker_request_round_trips_phase_names() {
    // The spawn side passes phase by name; the CLI side parses it back.
    for phase in Phase::ALL {
        assert_eq!(phase.as_str().parse::<Phase>().unwrap(), phase);
    }
}
