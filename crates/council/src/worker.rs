// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detached background worker.
//!
//! `ask --background` spawns the current executable again with a hidden
//! subcommand, all three stdio streams detached and its own process
//! group, then returns immediately. The worker loads config, runs the
//! orchestrator synchronously, and exits; the thread files are the only
//! channel back. A crashed worker therefore shows up as members whose
//! stream file exists but whose final message never arrived, which the
//! status deriver reports as running (or stalled, once the stream stops
//! growing past `council.stalled_after`).

use kd_core::{Phase, ThreadId};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

/// Hidden subcommand the CLI registers for the worker entry point.
pub const WORKER_SUBCOMMAND: &str = "council-worker";

/// What the driver hands to the detached worker.
#[derive(Debug, Clone)]
pub struct DetachedWorker {
    pub state_dir: std::path::PathBuf,
    pub branch: String,
    pub thread: ThreadId,
    pub members: Vec<String>,
    pub prompt: String,
    pub phase: Phase,
}

/// Spawn the worker process and return its pid without waiting.
pub fn spawn_detached(request: &DetachedWorker) -> std::io::Result<u32> {
    let exe = std::env::current_exe()?;
    let mut command = Command::new(exe);
    command
        .arg(WORKER_SUBCOMMAND)
        .arg("--state-dir")
        .arg(&request.state_dir)
        .arg("--branch")
        .arg(&request.branch)
        .arg("--thread")
        .arg(request.thread.as_str())
        .arg("--phase")
        .arg(request.phase.as_str())
        .arg("--prompt")
        .arg(&request.prompt);
    for member in &request.members {
        command.arg("--member").arg(member);
    }
    command
        .current_dir(workdir_or_root(&request.state_dir))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0);

    let child = command.spawn()?;
    let pid = child.id();
    tracing::info!(pid, thread = %request.thread, "detached worker spawned");
    Ok(pid)
}

/// The worker should run member children where the driver ran: the
/// project root that owns the state directory.
fn workdir_or_root(state_dir: &Path) -> std::path::PathBuf {
    state_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
