// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd status`: per-member state of a thread, or a branch overview.
//!
//! Liveness evidence comes from the session record (pid still alive) and
//! the stream file (present, and recently grown). With
//! `council.stalled_after` configured, a stream that stopped growing past
//! that many seconds reports the member as stalled so `kd retry` can pick
//! it up.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use crate::{color, env, output};
use clap::Args;
use kd_core::ThreadId;
use kd_store::{derive_status, pid_alive, LivenessHint, SessionStore, ThreadStore};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Thread to inspect; omit for the branch overview
    pub thread: Option<String>,
}

pub async fn run(args: StatusArgs) -> Result<(), ExitError> {
    let ctx = CliContext::load()?;
    let store = ctx.thread_store();
    println!("{}", color::dim(&format!("speaking as: {}", env::identity())));

    let Some(thread) = args.thread else {
        let summaries = store.list_threads()?;
        if summaries.is_empty() {
            println!("no threads on branch {:?}", ctx.branch);
            return Ok(());
        }
        for summary in summaries {
            output::print_thread_summary(&summary);
        }
        return Ok(());
    };

    let thread = ThreadId::new(thread);
    let declared = ctx.declared_members(&store, &thread)?;
    let messages = store.list_messages(&thread)?;
    let sessions = ctx.session_store();
    let stalled_after = ctx.config.council.stalled_after;

    let statuses = derive_status(&messages, &declared, |member| {
        member_liveness(&store, &sessions, &thread, member, stalled_after)
    });
    if statuses.is_empty() {
        println!("no turn in flight");
        return Ok(());
    }
    output::print_statuses(&statuses);
    Ok(())
}

/// Liveness evidence for one member with no reply yet.
fn member_liveness(
    store: &ThreadStore,
    sessions: &SessionStore,
    thread: &ThreadId,
    member: &str,
    stalled_after: Option<u64>,
) -> LivenessHint {
    for ext in ["jsonl", "json"] {
        let path = store.stream_path(thread, member, ext);
        let Ok(meta) = std::fs::metadata(&path) else {
            continue;
        };
        if let Some(limit) = stalled_after {
            let age = meta
                .modified()
                .ok()
                .and_then(|mtime| mtime.elapsed().ok())
                .map(|age| age.as_secs());
            if age.is_some_and(|secs| secs > limit) {
                return LivenessHint::Stalled;
            }
        }
        return LivenessHint::Live;
    }
    let pid = sessions.load(member).ok().flatten().and_then(|record| record.pid);
    match pid {
        Some(pid) if pid_alive(pid) => LivenessHint::Live,
        _ => LivenessHint::Dead,
    }
}
