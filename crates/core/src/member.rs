// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-member state as derived from thread artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one expected responder within the latest turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// No reply yet and no sign of a live run.
    Pending,
    /// A run is in flight (live pid or growing stream file).
    Running,
    /// A run looked alive once but its stream stopped growing.
    Stalled,
    /// A normal reply landed.
    Responded,
    /// The reply carries the error prefix.
    Errored,
    /// The reply carries the timeout prefix.
    TimedOut,
    /// The reply carries the interrupted prefix.
    Interrupted,
}

impl MemberStatus {
    /// True when the member will not make further progress this turn.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MemberStatus::Responded
                | MemberStatus::Errored
                | MemberStatus::TimedOut
                | MemberStatus::Interrupted
        )
    }

    /// True when a retry should re-ask this member.
    pub fn needs_retry(&self) -> bool {
        !matches!(self, MemberStatus::Responded | MemberStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Running => "running",
            MemberStatus::Stalled => "stalled",
            MemberStatus::Responded => "responded",
            MemberStatus::Errored => "errored",
            MemberStatus::TimedOut => "timed_out",
            MemberStatus::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "member_tests.rs"]
mod tests;
