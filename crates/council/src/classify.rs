// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry classification.
//!
//! Pure function from observed run facts to an outcome. Timeout is not
//! auto-retriable (the same prompt will likely time out again) but the
//! user can still re-ask with the retry command; command-not-found and
//! version mismatch are dead ends; an empty success is worth one more
//! attempt; any other non-zero exit is treated as transient.

/// Outcome of one member run, as far as retry policy is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Retriable,
    NonRetriable,
    TimedOut,
}

/// Classify a finished (or killed) run.
pub fn classify(
    exit_code: Option<i32>,
    stderr_tail: &str,
    stdout: &str,
    timed_out: bool,
) -> RunOutcome {
    if timed_out {
        return RunOutcome::TimedOut;
    }
    match exit_code {
        Some(0) if stdout.trim().is_empty() => RunOutcome::Retriable,
        Some(0) => RunOutcome::Succeeded,
        Some(127) => RunOutcome::NonRetriable,
        _ if command_not_found(stderr_tail) => RunOutcome::NonRetriable,
        _ if version_mismatch(stderr_tail) => RunOutcome::NonRetriable,
        _ => RunOutcome::Retriable,
    }
}

/// Shell/exec variants of "the vendor binary is not there".
fn command_not_found(stderr: &str) -> bool {
    stderr.contains("command not found") || stderr.contains("No such file or directory")
}

/// The CLI exists but does not speak the flags we pass: a newer contract
/// than the installed version, effectively a protocol mismatch.
fn version_mismatch(stderr: &str) -> bool {
    stderr.contains("unrecognized option")
        || stderr.contains("unknown option")
        || stderr.contains("unexpected argument")
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
