// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use kd_core::Recipients;

fn msg(seq: u32, from: &str, to: Recipients, body: &str) -> Message {
    Message {
        seq,
        from: from.to_string(),
        to,
        timestamp: Utc::now(),
        refs: Vec::new(),
        extra: Vec::new(),
        body: body.to_string(),
    }
}

fn declared() -> Vec<String> {
    vec!["a".to_string(), "b".to_string(), "c".to_string()]
}

#[test]
fn empty_thread_has_no_statuses() {
    assert!(derive_status(&[], &declared(), |_| LivenessHint::Dead).is_empty());
}

#[test]
fn mixed_turn_classifies_each_member() {
    let messages = vec![
        msg(1, "king", Recipients::All, "question"),
        msg(2, "a", Recipients::All, "fine answer"),
        msg(3, "b", Recipients::All, "*Error: exited with code 1"),
        msg(4, "c", Recipients::All, "*Timeout: exceeded 2s\n\npartial text"),
    ];
    let statuses = derive_status(&messages, &declared(), |_| LivenessHint::Dead);
    assert_eq!(statuses["a"], kd_core::MemberStatus::Responded);
    assert_eq!(statuses["b"], kd_core::MemberStatus::Errored);
    assert_eq!(statuses["c"], kd_core::MemberStatus::TimedOut);
}

#[test]
fn only_latest_turn_counts() {
    let messages = vec![
        msg(1, "king", Recipients::All, "first question"),
        msg(2, "a", Recipients::All, "old answer"),
        msg(3, "king", Recipients::All, "second question"),
    ];
    let statuses = derive_status(&messages, &declared(), |_| LivenessHint::Dead);
    assert_eq!(statuses["a"], kd_core::MemberStatus::Pending);
}

#[test]
fn to_header_limits_expected_responders() {
    let messages = vec![msg(1, "king", Recipients::Named(vec!["b".to_string()]), "only b")];
    let statuses = derive_status(&messages, &declared(), |_| LivenessHint::Dead);
    assert_eq!(statuses.len(), 1);
    assert!(statuses.contains_key("b"));
}

#[test]
fn liveness_promotes_pending_to_running_or_stalled() {
    let messages = vec![msg(1, "king", Recipients::All, "q")];
    let statuses = derive_status(&messages, &declared(), |member| match member {
        "a" => LivenessHint::Live,
        "b" => LivenessHint::Stalled,
        _ => LivenessHint::Dead,
    });
    assert_eq!(statuses["a"], kd_core::MemberStatus::Running);
    assert_eq!(statuses["b"], kd_core::MemberStatus::Stalled);
    assert_eq!(statuses["c"], kd_core::MemberStatus::Pending);
}

#[test]
fn retry_success_after_failure_reads_as_responded() {
    let messages = vec![
        msg(1, "king", Recipients::All, "q"),
        msg(2, "a", Recipients::All, "*Error: transient"),
        msg(3, "a", Recipients::All, "recovered answer"),
    ];
    let statuses = derive_status(&messages, &declared(), |_| LivenessHint::Dead);
    assert_eq!(statuses["a"], kd_core::MemberStatus::Responded);
}

#[test]
fn interrupted_reply_reads_as_interrupted() {
    let messages = vec![
        msg(1, "king", Recipients::All, "q"),
        msg(2, "a", Recipients::All, "*Interrupted: cancelled\n\nhalf an answer"),
    ];
    let statuses = derive_status(&messages, &declared(), |_| LivenessHint::Dead);
    assert_eq!(statuses["a"], kd_core::MemberStatus::Interrupted);
}

#[test]
fn derivation_is_stable_across_calls() {
    let messages = vec![
        msg(1, "king", Recipients::All, "q"),
        msg(2, "a", Recipients::All, "answer"),
    ];
    let first = derive_status(&messages, &declared(), |_| LivenessHint::Dead);
    let second = derive_status(&messages, &declared(), |_| LivenessHint::Dead);
    assert_eq!(first, second);
}

#[test]
fn latest_turn_exposes_prompt_and_replies() {
    let messages = vec![
        msg(1, "king", Recipients::All, "q1"),
        msg(2, "a", Recipients::All, "r1"),
        msg(3, "king", Recipients::Named(vec!["a".to_string()]), "q2"),
        msg(4, "a", Recipients::All, "r2"),
    ];
    let turn = latest_turn(&messages, &declared()).unwrap();
    assert_eq!(turn.prompt.seq, 3);
    assert_eq!(turn.replies.len(), 1);
    assert_eq!(turn.expected, vec!["a".to_string()]);
}
