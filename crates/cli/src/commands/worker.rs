// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hidden `council-worker` entry point for detached runs.
//!
//! Spawned by `kd ask --background` with stdio detached. The human
//! message is already on disk; this process only runs the members and
//! exits. Its tracing output goes to a file under the state dir because
//! there is no terminal to speak to.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use clap::Args;
use kd_core::{Phase, ThreadId};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct WorkerArgs {
    #[arg(long)]
    pub state_dir: PathBuf,

    #[arg(long)]
    pub branch: String,

    #[arg(long)]
    pub thread: String,

    #[arg(long)]
    pub phase: String,

    #[arg(long)]
    pub prompt: String,

    #[arg(long = "member")]
    pub members: Vec<String>,
}

pub async fn run(args: WorkerArgs) -> Result<(), ExitError> {
    let ctx = CliContext::load_at(args.state_dir, args.branch)?;
    let phase: Phase = args
        .phase
        .parse()
        .map_err(|e: kd_core::PhaseParseError| ExitError::user(e.to_string()))?;
    let thread = ThreadId::new(args.thread);

    let cancel = CancellationToken::new();
    let cancel_on_term = cancel.clone();
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(_) => return,
        };
        sigterm.recv().await;
        cancel_on_term.cancel();
    });

    let council = ctx.council(phase);
    council
        .run(&thread, &args.members, &args.prompt, true, &cancel, None)
        .await?;
    tracing::info!(thread = %thread, "worker finished");
    Ok(())
}
