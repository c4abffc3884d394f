// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-directory layout.
//!
//! Everything kingdom persists lives under one project-local state root:
//!
//! ```text
//! <state>/config.json
//! <state>/branches/<branch>/threads/<thread-id>/
//! <state>/branches/<branch>/archive/<thread-id>/
//! <state>/branches/<branch>/sessions/<agent>.json
//! <state>/worker-logs/
//! ```

use std::path::{Path, PathBuf};

/// Resolved paths under one state root.
#[derive(Debug, Clone)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn branch_dir(&self, branch: &str) -> PathBuf {
        self.root.join("branches").join(sanitize_branch(branch))
    }

    pub fn threads_dir(&self, branch: &str) -> PathBuf {
        self.branch_dir(branch).join("threads")
    }

    pub fn archive_dir(&self, branch: &str) -> PathBuf {
        self.branch_dir(branch).join("archive")
    }

    pub fn sessions_dir(&self, branch: &str) -> PathBuf {
        self.branch_dir(branch).join("sessions")
    }

    pub fn worker_logs_dir(&self) -> PathBuf {
        self.root.join("worker-logs")
    }
}

/// Make a git branch name safe as a single path component.
pub fn sanitize_branch(branch: &str) -> String {
    let sanitized: String = branch
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "detached".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
