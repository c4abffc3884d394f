// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One member run: one vendor subprocess, start to classified finish.
//!
//! The runner builds the argv, spawns with stdin closed, tees stdout
//! line-by-line into the stream file, waits with a timeout, and parses
//! whatever was captured. It never returns an error to its caller; every
//! outcome becomes a [`MemberResponse`], including a timeout, a
//! cancellation, or a missing binary.

use crate::agent_config::AgentConfig;
use crate::classify::{classify, RunOutcome};
use kd_backend::stderr_tail;
use kd_core::{ERROR_PREFIX, INTERRUPTED_PREFIX, TIMEOUT_PREFIX};
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// Grace window between SIGTERM and SIGKILL.
const TERM_GRACE: Duration = Duration::from_secs(2);

/// Cap on draining stderr after the child is gone. An orphaned grandchild
/// can keep the pipe open long after the vendor process itself died; its
/// diagnostics are not worth waiting for.
const STDERR_DRAIN: Duration = Duration::from_secs(1);

/// Everything needed to run one member once.
#[derive(Debug)]
pub struct RunSpec<'a> {
    pub agent: &'a AgentConfig,
    /// The fully composed prompt. The runner does not compose; that is
    /// the orchestrator's job.
    pub prompt: &'a str,
    pub resume: Option<String>,
    pub timeout: Duration,
    /// Where to tee raw stdout lines, flushed per line, while running.
    pub stream_path: Option<PathBuf>,
    pub streaming: bool,
    pub workdir: PathBuf,
}

/// The result of one member run. Never an `Err`.
#[derive(Debug, Clone)]
pub struct MemberResponse {
    pub name: String,
    pub text: String,
    pub session_token: Option<String>,
    pub error: Option<String>,
    pub outcome: RunOutcome,
    pub elapsed: Duration,
    pub interrupted: bool,
}

impl MemberResponse {
    /// Whether the retry policy would re-run this member automatically.
    pub fn should_retry(&self) -> bool {
        matches!(self.outcome, RunOutcome::Retriable) && !self.interrupted
    }

    pub fn succeeded(&self) -> bool {
        !self.interrupted && matches!(self.outcome, RunOutcome::Succeeded)
    }

    /// Render the thread-message body for this response.
    ///
    /// Failure prefixes are followed by a blank line and any partial text,
    /// so the human can still inspect what arrived before things went
    /// wrong. A response with output and no error is always a plain body.
    pub fn to_body(&self) -> String {
        let partial = if self.text.is_empty() {
            String::new()
        } else {
            format!("\n\n{}", self.text)
        };
        if self.interrupted {
            format!(
                "{} {}{}",
                INTERRUPTED_PREFIX,
                self.error.as_deref().unwrap_or("run cancelled"),
                partial
            )
        } else if matches!(self.outcome, RunOutcome::TimedOut) {
            format!(
                "{} {}{}",
                TIMEOUT_PREFIX,
                self.error.as_deref().unwrap_or("run exceeded its timeout"),
                partial
            )
        } else if let Some(error) = &self.error {
            format!("{} {}{}", ERROR_PREFIX, error, partial)
        } else {
            self.text.clone()
        }
    }
}

/// What actually happened at the process level, before parsing.
struct RawRun {
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
    timed_out: bool,
    interrupted: bool,
    spawn_error: Option<std::io::Error>,
}

impl RawRun {
    fn spawn_failed(error: std::io::Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            timed_out: false,
            interrupted: false,
            spawn_error: Some(error),
        }
    }
}

/// Run one member to completion.
pub async fn run_member(spec: RunSpec<'_>, cancel: &CancellationToken) -> MemberResponse {
    let started = Instant::now();

    if let Err(reason) = crate::probe::ensure_available(&spec.agent.family).await {
        return MemberResponse {
            name: spec.agent.name.clone(),
            text: String::new(),
            session_token: None,
            error: Some(reason),
            outcome: RunOutcome::NonRetriable,
            elapsed: started.elapsed(),
            interrupted: false,
        };
    }

    let mut auto_retried = false;
    loop {
        let raw = run_once(&spec, cancel).await;

        if let Some(e) = raw.spawn_error {
            let program = spec.agent.family.base_argv.first().copied().unwrap_or("agent");
            let (error, outcome) = if e.kind() == std::io::ErrorKind::NotFound {
                (
                    format!("{} is not on PATH ({})", program, spec.agent.family.install_hint),
                    RunOutcome::NonRetriable,
                )
            } else {
                (format!("failed to launch {}: {}", program, e), RunOutcome::Retriable)
            };
            return MemberResponse {
                name: spec.agent.name.clone(),
                text: String::new(),
                session_token: None,
                error: Some(error),
                outcome,
                elapsed: started.elapsed(),
                interrupted: false,
            };
        }

        let parsed = (spec.agent.family.parse_response)(&raw.stdout, &raw.stderr, raw.exit_code);
        let tail = stderr_tail(&raw.stderr);
        let mut outcome = classify(raw.exit_code, &tail, &raw.stdout, raw.timed_out);
        if matches!(outcome, RunOutcome::Succeeded) && parsed.error.is_some() {
            // Clean exit, but the vendor payload itself reported failure.
            outcome = RunOutcome::Retriable;
        }

        // An empty success earns exactly one immediate re-run.
        if matches!(outcome, RunOutcome::Retriable)
            && raw.exit_code == Some(0)
            && raw.stdout.trim().is_empty()
            && !raw.interrupted
            && !auto_retried
        {
            auto_retried = true;
            tracing::debug!(agent = %spec.agent.name, "empty success, re-running once");
            if let Some(path) = &spec.stream_path {
                let _ = std::fs::remove_file(path);
            }
            continue;
        }

        let error = match outcome {
            RunOutcome::Succeeded => None,
            RunOutcome::TimedOut => Some(format!("no reply within {}s", spec.timeout.as_secs())),
            _ => Some(parsed.error.clone().unwrap_or_else(|| {
                if raw.exit_code == Some(0) && raw.stdout.trim().is_empty() {
                    "agent produced no output".to_string()
                } else {
                    "run failed".to_string()
                }
            })),
        };

        tracing::debug!(
            agent = %spec.agent.name,
            ?outcome,
            interrupted = raw.interrupted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "member run finished"
        );

        return MemberResponse {
            name: spec.agent.name.clone(),
            text: parsed.text,
            session_token: parsed.session_token,
            error,
            outcome,
            elapsed: started.elapsed(),
            interrupted: raw.interrupted,
        };
    }
}

/// One subprocess invocation: spawn, tee, wait.
async fn run_once(spec: &RunSpec<'_>, cancel: &CancellationToken) -> RawRun {
    let argv = spec.agent.build_argv(spec.prompt, spec.resume.as_deref(), spec.streaming);
    let Some((program, args)) = argv.split_first() else {
        return RawRun::spawn_failed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "empty argv",
        ));
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(&spec.workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return RawRun::spawn_failed(e),
    };

    // Drain stderr concurrently so a chatty vendor cannot dead-lock on a
    // full pipe while we read stdout.
    let stderr_pipe = child.stderr.take();
    let stderr_task = tokio::spawn(async move {
        let mut buf = String::new();
        if let Some(mut pipe) = stderr_pipe {
            let _ = pipe.read_to_string(&mut buf).await;
        }
        buf
    });

    let Some(stdout_pipe) = child.stdout.take() else {
        let _ = child.kill().await;
        return RawRun::spawn_failed(std::io::Error::other("stdout pipe missing"));
    };
    let mut lines = BufReader::new(stdout_pipe).lines();

    let mut stream_file = spec.stream_path.as_ref().and_then(|path| {
        std::fs::OpenOptions::new().create(true).append(true).open(path).ok()
    });

    let mut captured = String::new();
    let deadline = tokio::time::Instant::now() + spec.timeout;
    let mut timed_out = false;
    let mut interrupted = false;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                interrupted = true;
                break;
            }
            _ = tokio::time::sleep_until(deadline) => {
                timed_out = true;
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if let Some(file) = stream_file.as_mut() {
                            let _ = writeln!(file, "{}", line);
                            let _ = file.flush();
                        }
                        captured.push_str(&line);
                        captured.push('\n');
                    }
                    Ok(None) | Err(_) => break,
                }
            }
        }
    }

    let exit_code = if timed_out || interrupted {
        terminate(&mut child).await
    } else {
        match tokio::time::timeout_at(deadline, child.wait()).await {
            Ok(Ok(status)) => status.code(),
            Ok(Err(_)) => None,
            Err(_) => {
                // Stdout closed but the child lingered past the deadline.
                timed_out = true;
                terminate(&mut child).await
            }
        }
    };

    let stderr = match tokio::time::timeout(STDERR_DRAIN, stderr_task).await {
        Ok(Ok(buf)) => buf,
        _ => String::new(),
    };
    RawRun {
        stdout: captured,
        stderr,
        exit_code,
        timed_out,
        interrupted,
        spawn_error: None,
    }
}

/// Graceful-then-forced termination: SIGTERM, a short grace window, SIGKILL.
async fn terminate(child: &mut Child) -> Option<i32> {
    if let Some(pid) = child.id() {
        if let Ok(pid) = i32::try_from(pid) {
            let _ = nix::sys::signal::kill(
                nix::unistd::Pid::from_raw(pid),
                nix::sys::signal::Signal::SIGTERM,
            );
            if let Ok(Ok(status)) = tokio::time::timeout(TERM_GRACE, child.wait()).await {
                return status.code();
            }
        }
    }
    let _ = child.kill().await;
    child.try_wait().ok().flatten().and_then(|status| status.code())
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
