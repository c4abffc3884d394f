// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd session`: inspect or reset per-agent session records.

use crate::context::CliContext;
use crate::exit_error::ExitError;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Forget an agent's resume token; the next run starts fresh
    Reset { agent: String },
    /// Print an agent's session record
    Show { agent: String },
}

pub async fn run(args: SessionArgs) -> Result<(), ExitError> {
    let ctx = CliContext::load()?;
    let sessions = ctx.session_store();
    match args.command {
        SessionCommand::Reset { agent } => {
            if ctx.config.agent(&agent).is_none() {
                return Err(ExitError::user(format!("unknown agent {:?}", agent)));
            }
            sessions.reset(&agent)?;
            println!("session for {} reset", agent);
            Ok(())
        }
        SessionCommand::Show { agent } => {
            match sessions.load(&agent)? {
                Some(record) => {
                    let rendered = serde_json::to_string_pretty(&record)
                        .map_err(|e| ExitError::user(e.to_string()))?;
                    println!("{}", rendered);
                }
                None => println!("no session for {}", agent),
            }
            Ok(())
        }
    }
}
