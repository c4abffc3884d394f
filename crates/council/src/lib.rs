// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The council runtime: parallel member dispatch over thread storage.
//!
//! One orchestrator run fans a prompt out to N member subprocesses,
//! streams their output to per-member files, and persists every outcome
//! as a thread message. Retry, watch, the detached worker, and the
//! peasant harness are all thin layers over the same runner.

mod agent_config;
mod classify;
mod error;
mod orchestrator;
mod peasant;
mod probe;
mod prompt;
mod retry;
mod runner;
#[cfg(test)]
pub(crate) mod test_support;
mod watch;
mod worker;

pub use agent_config::AgentConfig;
pub use classify::{classify, RunOutcome};
pub use error::CouncilError;
pub use orchestrator::{Council, ResponseCallback};
pub use peasant::{
    find_stop_signal, PeasantHarness, PeasantOutcome, PeasantReport, BLOCKED_SENTINEL,
    DONE_SENTINEL, FAILED_SENTINEL,
};
pub use prompt::{compose_for_agent, compose_prompt, SAFETY_PREAMBLE};
pub use runner::{run_member, MemberResponse, RunSpec};
pub use watch::{watch_thread, WatchEvent, WatchOptions, WatchOutcome};
pub use worker::{spawn_detached, DetachedWorker, WORKER_SUBCOMMAND};
