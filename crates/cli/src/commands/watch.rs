// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd watch`: tail a thread's streams and messages live.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use crate::{color, output};
use clap::Args;
use kd_core::{StreamFrame, ThreadId};
use kd_council::{watch_thread, WatchEvent, WatchOptions, WatchOutcome};
use std::io::Write;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Thread to watch
    pub thread: String,

    /// Give up after this many seconds (default: council.timeout)
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn run(args: WatchArgs) -> Result<(), ExitError> {
    let ctx = CliContext::load()?;
    let store = ctx.thread_store();
    let thread = ThreadId::new(args.thread);
    store.require(&thread)?;

    let declared = ctx.declared_members(&store, &thread)?;
    let messages = store.list_messages(&thread)?;
    let expected = kd_store::latest_turn(&messages, &declared)
        .map(|turn| turn.expected)
        .unwrap_or(declared);
    if expected.is_empty() {
        return Err(ExitError::user("thread has no expected responders to watch"));
    }

    let options = WatchOptions {
        timeout: Duration::from_secs(args.timeout.unwrap_or(ctx.config.council.timeout)),
        poll_interval: Duration::from_millis(250),
    };

    let mut mid_stream = false;
    let outcome = watch_thread(
        &ctx.config,
        &store,
        &thread,
        &expected,
        options,
        |event| match event {
            WatchEvent::Frame { member, frame } => match frame {
                StreamFrame::Token { text } => {
                    print!("{}", text);
                    let _ = std::io::stdout().flush();
                    mid_stream = true;
                }
                StreamFrame::Thinking { .. } => {}
                StreamFrame::Status { phase } => {
                    tracing::debug!(member = member.as_str(), phase = phase.as_str(), "stream status");
                }
                StreamFrame::Error { message } => {
                    eprintln!("{}", color::dim(&format!("[{}] {}", member, message)));
                }
                StreamFrame::Session { .. } => {}
            },
            WatchEvent::Message(message) => {
                if mid_stream {
                    println!();
                    mid_stream = false;
                }
                output::print_message(&message);
            }
        },
    )
    .await?;

    match outcome {
        WatchOutcome::Complete => Ok(()),
        WatchOutcome::TimedOut => Err(ExitError::timeout("watch timed out before the turn completed")),
    }
}
