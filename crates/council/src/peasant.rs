// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peasant harness: loop-until-done ticket execution.
//!
//! Each iteration composes ticket body + prior worklog + the peasant
//! phase instruction, runs the configured agent with a large timeout,
//! appends the reply verbatim to the ticket's thread, and scans for a
//! stop sentinel. Runner errors become worklog entries; a timeout is a
//! worklog entry and a terminal state. The surrounding CLI owns the git
//! worktree the harness runs inside.

use crate::agent_config::AgentConfig;
use crate::error::CouncilError;
use crate::prompt;
use crate::classify::RunOutcome;
use crate::runner::{run_member, RunSpec};
use kd_config::Config;
use kd_core::{Phase, Recipients, ThreadId, HUMAN_SENDER};
use kd_store::{MessageDraft, SessionStore, ThreadStore};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Whole-line sentinel: the ticket is finished.
pub const DONE_SENTINEL: &str = "DONE";
/// Whole-line sentinel prefix: the agent cannot proceed; the rest of the
/// line is the reason.
pub const BLOCKED_SENTINEL: &str = "BLOCKED:";
/// Whole-line sentinel: the agent gave up.
pub const FAILED_SENTINEL: &str = "FAILED";

/// Terminal state of a ticket run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeasantOutcome {
    Done,
    Blocked(String),
    Failed,
    MaxIterations,
    TimedOut,
    Interrupted,
}

/// What a ticket run amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeasantReport {
    pub iterations: u32,
    pub outcome: PeasantOutcome,
}

/// Scan a reply for a stop sentinel, last line wins.
pub fn find_stop_signal(text: &str) -> Option<PeasantOutcome> {
    for line in text.lines().rev() {
        let line = line.trim();
        if line == DONE_SENTINEL {
            return Some(PeasantOutcome::Done);
        }
        if line == FAILED_SENTINEL {
            return Some(PeasantOutcome::Failed);
        }
        if let Some(reason) = line.strip_prefix(BLOCKED_SENTINEL) {
            return Some(PeasantOutcome::Blocked(reason.trim().to_string()));
        }
    }
    None
}

/// The loop wrapper around the member runner.
pub struct PeasantHarness {
    config: Config,
    store: ThreadStore,
    sessions: SessionStore,
    /// The isolated worktree the surrounding CLI prepared.
    workdir: PathBuf,
}

impl PeasantHarness {
    pub fn new(
        config: Config,
        store: ThreadStore,
        sessions: SessionStore,
        workdir: PathBuf,
    ) -> Self {
        Self { config, store, sessions, workdir }
    }

    /// Run one ticket to a terminal state, appending every reply to the
    /// ticket's thread as a worklog entry.
    pub async fn run_ticket(
        &self,
        thread: &ThreadId,
        ticket: &str,
        cancel: &CancellationToken,
    ) -> Result<PeasantReport, CouncilError> {
        let agent_name = self
            .config
            .peasant
            .agent
            .clone()
            .ok_or(CouncilError::PeasantUnconfigured)?;
        let agent = AgentConfig::resolve(&self.config, &agent_name)?;
        self.run_ticket_with(thread, ticket, agent, cancel).await
    }

    /// The loop itself, over an already-resolved agent.
    pub(crate) async fn run_ticket_with(
        &self,
        thread: &ThreadId,
        ticket: &str,
        agent: AgentConfig,
        cancel: &CancellationToken,
    ) -> Result<PeasantReport, CouncilError> {
        let timeout = Duration::from_secs(self.config.peasant.timeout);
        let max_iterations = self.config.peasant.max_iterations;

        for iteration in 1..=max_iterations {
            let worklog = self.store.list_messages(thread)?;
            let user = compose_ticket_prompt(ticket, worklog.iter().map(|m| {
                (m.from.as_str(), m.body.as_str())
            }));
            let composed =
                prompt::compose_for_agent(&self.config, &agent, Phase::Peasant, &user);
            let resume = match agent.family.resume_flag {
                Some(_) => self.sessions.load(&agent.name)?.and_then(|r| r.resume_token),
                None => None,
            };
            let stream_path =
                self.store.stream_path(thread, &agent.name, agent.family.stream_ext());
            let _ = std::fs::remove_file(&stream_path);

            let spec = RunSpec {
                agent: &agent,
                prompt: &composed,
                resume,
                timeout,
                stream_path: Some(stream_path.clone()),
                streaming: false,
                workdir: self.workdir.clone(),
            };
            let response = run_member(spec, cancel).await;

            self.store.add_message(
                thread,
                &MessageDraft::new(
                    agent.name.clone(),
                    Recipients::Named(vec![HUMAN_SENDER.to_string()]),
                    response.to_body(),
                ),
            )?;
            let _ = std::fs::remove_file(&stream_path);

            if let Some(token) = &response.session_token {
                self.sessions.update(&agent.name, |record| {
                    record.resume_token = Some(token.clone());
                })?;
            }

            if response.interrupted {
                return Ok(PeasantReport { iterations: iteration, outcome: PeasantOutcome::Interrupted });
            }
            if matches!(response.outcome, RunOutcome::TimedOut) {
                return Ok(PeasantReport { iterations: iteration, outcome: PeasantOutcome::TimedOut });
            }
            if let Some(outcome) = find_stop_signal(&response.text) {
                tracing::info!(thread = %thread, iteration, ?outcome, "ticket reached a stop signal");
                return Ok(PeasantReport { iterations: iteration, outcome });
            }
            // Errors landed in the worklog above; keep iterating, the next
            // pass sees them as context.
        }

        Ok(PeasantReport { iterations: max_iterations, outcome: PeasantOutcome::MaxIterations })
    }
}

/// Ticket body, then each worklog entry under a numbered heading, then
/// the standing instruction.
fn compose_ticket_prompt<'a>(
    ticket: &str,
    worklog: impl Iterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut out = String::from("## Ticket\n\n");
    out.push_str(ticket);
    let mut any = false;
    for (i, (from, body)) in worklog.enumerate() {
        if !any {
            out.push_str("\n\n## Worklog\n");
            any = true;
        }
        out.push_str(&format!("\n### Entry {} ({})\n\n{}\n", i + 1, from, body));
    }
    out.push_str(
        "\n\nContinue working the ticket. When it is complete, end your reply with a line \
         containing only DONE. If you cannot proceed, end with BLOCKED: <reason>. \
         If the ticket is impossible, end with FAILED.",
    );
    out
}

#[cfg(test)]
#[path = "peasant_tests.rs"]
mod tests;
