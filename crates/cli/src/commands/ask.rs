// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd ask`: put a prompt to the council.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use crate::{color, output};
use clap::Args;
use kd_core::{Phase, Recipients, ThreadId, HUMAN_SENDER};
use kd_council::{spawn_detached, DetachedWorker, MemberResponse};
use kd_store::MessageDraft;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question for the council
    pub prompt: String,

    /// Ask only these members (repeatable); default is council.members
    #[arg(long = "member")]
    pub members: Vec<String>,

    /// Append the turn to an existing thread instead of starting one
    #[arg(long)]
    pub thread: Option<String>,

    /// Override council.timeout for this run (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Detach a background worker and return immediately
    #[arg(long)]
    pub background: bool,

    /// Phase whose prompts apply (council, design, review, peasant)
    #[arg(long, default_value = "council")]
    pub phase: String,
}

pub async fn run(args: AskArgs) -> Result<(), ExitError> {
    let mut ctx = CliContext::load()?;
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err(ExitError::user("--timeout must be positive"));
        }
        ctx.config.council.timeout = timeout;
    }
    let phase: Phase = args
        .phase
        .parse()
        .map_err(|e: kd_core::PhaseParseError| ExitError::user(e.to_string()))?;

    let members = if args.members.is_empty() {
        ctx.config.council.members.clone()
    } else {
        args.members.clone()
    };
    if members.is_empty() {
        return Err(ExitError::user(
            "no council members configured; add agents and council.members to config.json",
        ));
    }
    for member in &members {
        if ctx.config.agent(member).is_none() {
            return Err(ExitError::user(format!("unknown agent {:?}", member)));
        }
    }

    let store = ctx.thread_store();

    // The driver writes the human message before invoking the
    // orchestrator (or detaching), so observers attaching immediately
    // already see the turn.
    let thread = match &args.thread {
        Some(id) => {
            let id = ThreadId::new(id.as_str());
            store.require(&id)?;
            id
        }
        None => store.create_thread(&members, phase)?,
    };
    let to = if members == ctx.config.council.members {
        Recipients::All
    } else {
        Recipients::Named(members.clone())
    };
    store.add_message(&thread, &MessageDraft::new(HUMAN_SENDER, to, args.prompt.clone()))?;
    println!("{}", thread);

    if args.background {
        let pid = spawn_detached(&DetachedWorker {
            state_dir: ctx.layout.root().to_path_buf(),
            branch: ctx.branch.clone(),
            thread: thread.clone(),
            members,
            prompt: args.prompt,
            phase,
        })
        .map_err(|e| ExitError::user(format!("failed to spawn worker: {}", e)))?;
        println!("{}", color::dim(&format!("worker pid {}; `kd watch {}` to follow", pid, thread)));
        return Ok(());
    }

    let council = ctx.council(phase);
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let mut on_response = |response: &MemberResponse| {
        let state = if response.succeeded() {
            color::status(kd_core::MemberStatus::Responded)
        } else if response.interrupted {
            color::status(kd_core::MemberStatus::Interrupted)
        } else {
            color::status(kd_core::MemberStatus::Errored)
        };
        println!(
            "{} {} ({})",
            response.name,
            state,
            kd_core::format_elapsed(response.elapsed.as_secs())
        );
    };

    let responses = council
        .run(&thread, &members, &args.prompt, true, &cancel, Some(&mut on_response))
        .await?;

    if output::any_failed(&responses) {
        return Err(ExitError::agent_failure(format!(
            "some members failed; inspect with `kd show {}` or re-ask with `kd retry {}`",
            thread, thread
        )));
    }
    Ok(())
}
