// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd list`: thread summaries for the current branch.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use crate::output;
use clap::Args;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List another branch's threads
    #[arg(long)]
    pub branch: Option<String>,
}

pub async fn run(args: ListArgs) -> Result<(), ExitError> {
    let mut ctx = CliContext::load()?;
    if let Some(branch) = args.branch {
        ctx.branch = branch;
    }
    let summaries = ctx.thread_store().list_threads()?;
    if summaries.is_empty() {
        println!("no threads on branch {:?}", ctx.branch);
        return Ok(());
    }
    for summary in summaries {
        output::print_thread_summary(&summary);
    }
    Ok(())
}
