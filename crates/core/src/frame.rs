// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized stream frames.
//!
//! Every backend family's live event stream is reduced to this one enum.
//! Vendor events that carry nothing useful extract to `None` upstream and
//! never reach observers.

use serde::{Deserialize, Serialize};

/// One normalized frame of live agent output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamFrame {
    /// A chunk of reply text.
    Token { text: String },
    /// A chunk of reasoning text (not part of the final reply).
    Thinking { text: String },
    /// A lifecycle transition reported by the vendor (e.g. "init", "result").
    Status { phase: String },
    /// An error reported mid-stream.
    Error { message: String },
    /// The vendor's resume token for this conversation.
    Session { token: String },
}

impl StreamFrame {
    /// Reply text carried by this frame, if any.
    pub fn token_text(&self) -> Option<&str> {
        match self {
            StreamFrame::Token { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
