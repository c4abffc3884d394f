// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment access for the CLI.

use std::path::PathBuf;

/// Overrides the state directory location.
pub const STATE_DIR_ENV: &str = "KINGDOM_STATE_DIR";

/// Project-local state directory name.
pub const STATE_DIR_NAME: &str = ".kingdom";

/// Resolve the state directory: `KINGDOM_STATE_DIR`, else `.kingdom/` at
/// the nearest enclosing git root, else `.kingdom/` in the current
/// directory.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(STATE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut dir = cwd.as_path();
    loop {
        if dir.join(".git").exists() {
            return dir.join(STATE_DIR_NAME);
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    cwd.join(STATE_DIR_NAME)
}

/// Current git branch, sanitized later by the store; `main` outside a repo.
pub fn current_branch() -> String {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output();
    match output {
        Ok(out) if out.status.success() => {
            let branch = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if branch.is_empty() {
                "main".to_string()
            } else {
                branch
            }
        }
        _ => "main".to_string(),
    }
}

/// Self-identification for status output: a process launched from an
/// agent-hosted terminal (the vendor sets `CLAUDECODE`) is the King's
/// own shell; anything else is a Hand. Display only, never behavior.
pub fn identity() -> &'static str {
    if std::env::var_os("CLAUDECODE").is_some() {
        "king"
    } else {
        "hand"
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
