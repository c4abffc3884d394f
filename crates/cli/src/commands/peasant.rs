// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd peasant`: run one ticket autonomously with the configured agent.
//!
//! The surrounding workflow owns the isolated worktree; this command just
//! points the harness at it.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use clap::Args;
use kd_core::{Phase, ThreadId};
use kd_council::PeasantOutcome;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct PeasantArgs {
    /// File holding the ticket body
    #[arg(long)]
    pub ticket: PathBuf,

    /// Existing worklog thread to continue
    #[arg(long)]
    pub thread: Option<String>,

    /// Worktree to run inside (default: the project root)
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

pub async fn run(args: PeasantArgs) -> Result<(), ExitError> {
    let ctx = CliContext::load()?;
    let agent = ctx
        .config
        .peasant
        .agent
        .clone()
        .ok_or_else(|| ExitError::user("peasant.agent is not configured"))?;

    let ticket = std::fs::read_to_string(&args.ticket)
        .map_err(|e| ExitError::user(format!("cannot read ticket {}: {}", args.ticket.display(), e)))?;

    let store = ctx.thread_store();
    let thread = match &args.thread {
        Some(id) => {
            let id = ThreadId::new(id.as_str());
            store.require(&id)?;
            id
        }
        None => store.create_thread(&[agent.clone()], Phase::Peasant)?,
    };

    let workdir = args.workdir.unwrap_or_else(|| ctx.workdir());
    let harness = ctx.peasant_harness(workdir);

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let report = harness.run_ticket(&thread, &ticket, &cancel).await?;
    println!("{}", thread);
    match report.outcome {
        PeasantOutcome::Done => {
            println!("done after {} iteration(s)", report.iterations);
            Ok(())
        }
        PeasantOutcome::TimedOut => Err(ExitError::timeout(format!(
            "iteration {} timed out; worklog has the partial output",
            report.iterations
        ))),
        PeasantOutcome::Blocked(reason) => {
            Err(ExitError::agent_failure(format!("blocked: {}", reason)))
        }
        PeasantOutcome::Failed => Err(ExitError::agent_failure("agent reported failure")),
        PeasantOutcome::MaxIterations => Err(ExitError::agent_failure(format!(
            "no stop signal after {} iterations",
            report.iterations
        ))),
        PeasantOutcome::Interrupted => Err(ExitError::user("interrupted")),
    }
}
