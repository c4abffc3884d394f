// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The council orchestrator.
//!
//! Fans one prompt out to N members, bounded by the configured
//! parallelism, and serializes results at the thread-store boundary as
//! they complete. Per-member failures become messages, never errors; the
//! only failures that propagate are config problems and store collisions.

use crate::agent_config::AgentConfig;
use crate::error::CouncilError;
use crate::prompt;
use crate::runner::{run_member, MemberResponse, RunSpec};
use chrono::Utc;
use kd_config::Config;
use kd_core::{Phase, Recipients, ThreadId, HUMAN_SENDER};
use kd_store::{MessageDraft, SessionStore, ThreadStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Per-response observer, invoked in completion order after each message
/// is persisted and before the next write begins.
pub type ResponseCallback<'a> = &'a mut dyn FnMut(&MemberResponse);

/// One configured council bound to a branch's stores.
pub struct Council {
    pub(crate) config: Config,
    pub(crate) store: ThreadStore,
    pub(crate) sessions: SessionStore,
    pub(crate) workdir: PathBuf,
    pub(crate) phase: Phase,
}

impl Council {
    pub fn new(
        config: Config,
        store: ThreadStore,
        sessions: SessionStore,
        workdir: PathBuf,
        phase: Phase,
    ) -> Self {
        Self { config, store, sessions, workdir, phase }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    /// Ask the council: write the human message, then run every member.
    ///
    /// With `thread` set the turn is appended to an existing conversation;
    /// otherwise a fresh thread is created. A cancellation that fires
    /// before anything starts produces zero new messages.
    pub async fn ask(
        &self,
        thread: Option<ThreadId>,
        members: &[String],
        user_prompt: &str,
        streaming: bool,
        cancel: &CancellationToken,
        on_response: Option<ResponseCallback<'_>>,
    ) -> Result<(ThreadId, Vec<MemberResponse>), CouncilError> {
        let thread = match thread {
            Some(id) => {
                self.store.require(&id)?;
                id
            }
            None => self.store.create_thread(members, self.phase)?,
        };
        if cancel.is_cancelled() {
            return Ok((thread, Vec::new()));
        }

        let to = if members == self.config.council.members.as_slice() {
            Recipients::All
        } else {
            Recipients::Named(members.to_vec())
        };
        self.store
            .add_message(&thread, &MessageDraft::new(HUMAN_SENDER, to, user_prompt))?;

        let responses = self
            .run(&thread, members, user_prompt, streaming, cancel, on_response)
            .await?;
        Ok((thread, responses))
    }

    /// Run members against an existing thread whose human message is
    /// already written. Used by `ask`, the retry engine, and the worker.
    pub async fn run(
        &self,
        thread: &ThreadId,
        members: &[String],
        user_prompt: &str,
        streaming: bool,
        cancel: &CancellationToken,
        on_response: Option<ResponseCallback<'_>>,
    ) -> Result<Vec<MemberResponse>, CouncilError> {
        // Resolve every member first so config mistakes surface before any
        // child process starts.
        let agents: Vec<AgentConfig> = members
            .iter()
            .map(|name| AgentConfig::resolve(&self.config, name))
            .collect::<Result<_, _>>()?;
        self.run_agents(thread, agents, user_prompt, streaming, cancel, on_response)
            .await
    }

    /// The fan-out itself, over already-resolved agents.
    pub(crate) async fn run_agents(
        &self,
        thread: &ThreadId,
        agents: Vec<AgentConfig>,
        user_prompt: &str,
        streaming: bool,
        cancel: &CancellationToken,
        mut on_response: Option<ResponseCallback<'_>>,
    ) -> Result<Vec<MemberResponse>, CouncilError> {
        if cancel.is_cancelled() {
            return Ok(Vec::new());
        }

        let timeout = Duration::from_secs(self.config.council.timeout);
        let cap = self.config.council.parallelism.unwrap_or_else(|| agents.len().max(1));
        let semaphore = Arc::new(Semaphore::new(cap.max(1)));
        let mut join_set: JoinSet<(MemberResponse, PathBuf)> = JoinSet::new();

        let names: Vec<String> = agents.iter().map(|a| a.name.clone()).collect();
        tracing::info!(
            thread = %thread,
            members = ?names,
            phase = %self.phase,
            timeout_s = timeout.as_secs(),
            "council run starting"
        );

        for agent in agents {
            let composed = prompt::compose_for_agent(&self.config, &agent, self.phase, user_prompt);
            let resume = match agent.family.resume_flag {
                Some(_) => self.sessions.load(&agent.name)?.and_then(|r| r.resume_token),
                None => None,
            };
            let stream_path = self.store.stream_path(thread, &agent.name, agent.family.stream_ext());
            // A leftover stream file from a previous turn would confuse
            // watcher offsets; start clean.
            let _ = std::fs::remove_file(&stream_path);

            self.sessions.update(&agent.name, |record| {
                record.pid = Some(std::process::id());
                record.status = "running".to_string();
                record.started_at = Some(Utc::now());
            })?;

            let cancel = cancel.clone();
            let semaphore = Arc::clone(&semaphore);
            let workdir = self.workdir.clone();
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let spec = RunSpec {
                    agent: &agent,
                    prompt: &composed,
                    resume,
                    timeout,
                    stream_path: Some(stream_path.clone()),
                    streaming,
                    workdir,
                };
                let response = run_member(spec, &cancel).await;
                (response, stream_path)
            });
        }

        let mut responses = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            let (response, stream_path) =
                joined.map_err(|e| CouncilError::Io(std::io::Error::other(e)))?;

            let draft = MessageDraft::new(
                response.name.clone(),
                Recipients::Named(vec![HUMAN_SENDER.to_string()]),
                response.to_body(),
            );
            self.store.add_message(thread, &draft)?;
            // The text now lives in the message; the scratch file is done.
            let _ = std::fs::remove_file(&stream_path);

            self.sessions.update(&response.name, |record| {
                if let Some(token) = &response.session_token {
                    record.resume_token = Some(token.clone());
                }
                record.pid = None;
                record.status = if response.succeeded() {
                    "idle".to_string()
                } else {
                    "errored".to_string()
                };
            })?;

            if let Some(callback) = &mut on_response {
                callback(&response);
            }
            responses.push(response);
        }

        tracing::info!(
            thread = %thread,
            responded = responses.iter().filter(|r| r.succeeded()).count(),
            total = responses.len(),
            "council run finished"
        );
        Ok(responses)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
