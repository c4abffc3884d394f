// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-member status, derived purely from thread messages.
//!
//! The only failure signal is the body prefix, read through the shared
//! classifier in `kd-core`. Liveness (pid alive, stream growing) is an
//! input the caller supplies, so the derivation itself stays a pure
//! function of its arguments.

use kd_core::{FailureKind, MemberStatus, Message, HUMAN_SENDER};
use std::collections::BTreeMap;

/// The latest turn: the last human message, the replies after it, and the
/// members expected to answer.
#[derive(Debug)]
pub struct TurnView<'a> {
    pub prompt: &'a Message,
    pub replies: Vec<&'a Message>,
    pub expected: Vec<String>,
}

/// Slice the latest turn out of a message list.
///
/// `declared` is the thread's declared member set, used to expand the
/// "all" sentinel in the prompt's `to` header.
pub fn latest_turn<'a>(messages: &'a [Message], declared: &[String]) -> Option<TurnView<'a>> {
    let prompt = messages.iter().filter(|m| m.from == HUMAN_SENDER).next_back()?;
    let replies = messages.iter().filter(|m| m.seq > prompt.seq).collect();
    let expected = prompt.to.expand(declared);
    Some(TurnView { prompt, replies, expected })
}

/// Caller-supplied liveness evidence for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LivenessHint {
    /// No live pid, no stream activity.
    #[default]
    Dead,
    /// A run is visibly in flight.
    Live,
    /// A run looked alive once but its stream stopped growing.
    Stalled,
}

/// Compute each expected member's status for the latest turn.
///
/// Pure in the message list: repeated calls over an unchanged directory
/// return equal results. Returns an empty map when the thread has no
/// human message yet.
pub fn derive_status(
    messages: &[Message],
    declared: &[String],
    liveness: impl Fn(&str) -> LivenessHint,
) -> BTreeMap<String, MemberStatus> {
    let mut statuses = BTreeMap::new();
    let Some(turn) = latest_turn(messages, declared) else {
        return statuses;
    };
    for member in &turn.expected {
        let replies: Vec<&&Message> =
            turn.replies.iter().filter(|m| &m.from == member).collect();
        let status = if replies.iter().any(|m| m.failure().is_none()) {
            // Any normal reply in the turn settles it, whatever failed
            // attempts came before.
            MemberStatus::Responded
        } else if let Some(last) = replies.last() {
            match last.failure() {
                Some(FailureKind::Errored) => MemberStatus::Errored,
                Some(FailureKind::TimedOut) => MemberStatus::TimedOut,
                Some(FailureKind::Interrupted) => MemberStatus::Interrupted,
                None => MemberStatus::Responded,
            }
        } else {
            match liveness(member) {
                LivenessHint::Live => MemberStatus::Running,
                LivenessHint::Stalled => MemberStatus::Stalled,
                LivenessHint::Dead => MemberStatus::Pending,
            }
        };
        statuses.insert(member.clone(), status);
    }
    statuses
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
