// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Council error types.
//!
//! Per-member failures are never errors; they become `MemberResponse`s
//! and thread messages. What does surface here: config problems, store
//! collisions, and misuse (unknown agent, empty thread).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CouncilError {
    #[error(transparent)]
    Config(#[from] kd_config::ConfigError),

    #[error(transparent)]
    Store(#[from] kd_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown agent {0:?}")]
    UnknownAgent(String),

    #[error("agent {agent:?} names unregistered backend family {family:?}")]
    UnknownFamily { agent: String, family: String },

    #[error("thread has no human message to act on")]
    EmptyThread,

    #[error("peasant.agent is not configured")]
    PeasantUnconfigured,
}
