// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kd`: ask a council of coding agents and keep the conversation on disk.

mod color;
mod commands;
mod context;
mod env;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser, Debug)]
#[command(
    name = "kd",
    version,
    about = "Dispatch one prompt to a council of coding agents, durable on disk"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the council a question
    Ask(commands::ask::AskArgs),
    /// Tail a thread's live streams and messages
    Watch(commands::watch::WatchArgs),
    /// Per-member status of a thread, or the branch overview
    Status(commands::status::StatusArgs),
    /// Re-ask only the failed members of the latest turn
    Retry(commands::retry::RetryArgs),
    /// Print a thread's messages
    Show(commands::show::ShowArgs),
    /// List threads on the current branch
    List(commands::list::ListArgs),
    /// Inspect or reset per-agent session records
    Session(commands::session::SessionArgs),
    /// Move a finished thread into the archive
    Archive(commands::archive::ArchiveArgs),
    /// Run one ticket autonomously with the configured peasant agent
    Peasant(commands::peasant::PeasantArgs),
    /// Detached worker entry point (spawned by `ask --background`)
    #[command(name = "council-worker", hide = true)]
    CouncilWorker(commands::worker::WorkerArgs),
}

/// Set up tracing: stderr for interactive commands, a file under the
/// state dir for the detached worker (it has no terminal).
fn init_logging(worker_state_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    match worker_state_dir {
        Some(state_dir) => {
            let log_dir = state_dir.join("worker-logs");
            let _ = std::fs::create_dir_all(&log_dir);
            let appender = tracing_appender::rolling::daily(log_dir, "worker.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _log_guard = match &cli.command {
        Commands::CouncilWorker(args) => init_logging(Some(&args.state_dir)),
        _ => init_logging(None),
    };

    let result = match cli.command {
        Commands::Ask(args) => commands::ask::run(args).await,
        Commands::Watch(args) => commands::watch::run(args).await,
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Retry(args) => commands::retry::run(args).await,
        Commands::Show(args) => commands::show::run(args).await,
        Commands::List(args) => commands::list::run(args).await,
        Commands::Session(args) => commands::session::run(args).await,
        Commands::Archive(args) => commands::archive::run(args).await,
        Commands::Peasant(args) => commands::peasant::run(args).await,
        Commands::CouncilWorker(args) => commands::worker::run(args).await,
    };

    if let Err(error) = result {
        eprintln!("kd: {}", error.message);
        std::process::exit(error.code);
    }
}
