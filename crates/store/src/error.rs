// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store error types.

use kd_core::ThreadId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed message file {file}: {source}")]
    Message {
        file: String,
        #[source]
        source: kd_core::MessageError,
    },

    #[error("thread {thread} not found")]
    ThreadNotFound { thread: ThreadId },

    /// `add_message` exhausted its exclusive-create retries. Exceptional;
    /// surfaces as a fatal error from the orchestrator.
    #[error("sequence collision persisted after {attempts} attempts in thread {thread}")]
    Collision { thread: ThreadId, attempts: u32 },
}
