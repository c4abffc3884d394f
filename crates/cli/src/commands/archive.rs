// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd archive`: move a finished thread out of the active listing.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use clap::Args;
use kd_core::ThreadId;

#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Thread to archive
    pub thread: String,
}

pub async fn run(args: ArchiveArgs) -> Result<(), ExitError> {
    let ctx = CliContext::load()?;
    let store = ctx.thread_store();
    let thread = ThreadId::new(args.thread);
    let target = store.archive_thread(&thread)?;
    println!("archived to {}", target.display());
    Ok(())
}
