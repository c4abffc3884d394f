// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd retry`: re-ask only the failed members of the latest turn.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use crate::{color, output};
use clap::Args;
use kd_core::{Phase, ThreadId};
use kd_council::MemberResponse;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct RetryArgs {
    /// Thread whose latest turn to retry
    pub thread: String,

    /// Override council.timeout for this run (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn run(args: RetryArgs) -> Result<(), ExitError> {
    let mut ctx = CliContext::load()?;
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err(ExitError::user("--timeout must be positive"));
        }
        ctx.config.council.timeout = timeout;
    }

    let store = ctx.thread_store();
    let thread = ThreadId::new(args.thread);
    store.require(&thread)?;
    let phase = store
        .read_meta(&thread)?
        .map(|meta| meta.phase)
        .unwrap_or(Phase::Council);

    let council = ctx.council(phase);
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let mut on_response = |response: &MemberResponse| {
        let state = if response.succeeded() { "responded" } else { "failed" };
        println!(
            "{} {} ({})",
            response.name,
            state,
            kd_core::format_elapsed(response.elapsed.as_secs())
        );
    };

    let responses = council
        .retry(&thread, true, &cancel, Some(&mut on_response))
        .await?;

    if responses.is_empty() {
        println!("{}", color::dim("nothing to retry"));
        return Ok(());
    }
    if output::any_failed(&responses) {
        return Err(ExitError::agent_failure("some members failed again"));
    }
    Ok(())
}
