// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd show`: print a thread's messages.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use crate::output;
use clap::Args;
use kd_core::ThreadId;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Thread to print
    pub thread: String,

    /// Only the last N messages
    #[arg(long, conflicts_with = "range")]
    pub last: Option<usize>,

    /// Inclusive sequence range, e.g. 2..5
    #[arg(long)]
    pub range: Option<String>,
}

pub async fn run(args: ShowArgs) -> Result<(), ExitError> {
    let ctx = CliContext::load()?;
    let store = ctx.thread_store();
    let thread = ThreadId::new(args.thread);
    let messages = store.list_messages(&thread)?;

    let selected: Vec<_> = if let Some(range) = &args.range {
        let (lo, hi) = parse_range(range)
            .ok_or_else(|| ExitError::user(format!("invalid range {:?}, expected N..M", range)))?;
        messages
            .into_iter()
            .filter(|m| m.seq >= lo && m.seq <= hi)
            .collect()
    } else if let Some(last) = args.last {
        let skip = messages.len().saturating_sub(last);
        messages.into_iter().skip(skip).collect()
    } else {
        messages
    };

    for message in &selected {
        output::print_message(message);
    }
    Ok(())
}

/// Parse an inclusive `N..M` range.
fn parse_range(range: &str) -> Option<(u32, u32)> {
    let (lo, hi) = range.split_once("..")?;
    let lo: u32 = lo.trim().parse().ok()?;
    let hi: u32 = hi.trim().parse().ok()?;
    (lo <= hi).then_some((lo, hi))
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
