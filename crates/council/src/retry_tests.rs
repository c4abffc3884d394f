// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kd_core::{Phase, Recipients, HUMAN_SENDER};
use kd_store::{MessageDraft, SessionStore, StateLayout, ThreadStore};
use tempfile::TempDir;

fn council_at(dir: &TempDir) -> Council {
    let layout = StateLayout::new(dir.path().join("state"));
    Council::new(
        kd_config::Config::default(),
        ThreadStore::for_branch(&layout, "main"),
        SessionStore::for_branch(&layout, "main"),
        dir.path().to_path_buf(),
        Phase::Council,
    )
}

#[tokio::test]
async fn retry_on_fully_answered_turn_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let council = council_at(&dir);
    let members = vec!["a".to_string(), "b".to_string()];
    let thread = council.store().create_thread(&members, Phase::Council).unwrap();
    let store = council.store();
    store
        .add_message(&thread, &MessageDraft::new(HUMAN_SENDER, Recipients::All, "q"))
        .unwrap();
    store
        .add_message(&thread, &MessageDraft::new("a", Recipients::All, "answer a"))
        .unwrap();
    store
        .add_message(&thread, &MessageDraft::new("b", Recipients::All, "answer b"))
        .unwrap();

    let cancel = CancellationToken::new();
    let responses = council.retry(&thread, false, &cancel, None).await.unwrap();

    assert!(responses.is_empty());
    assert_eq!(store.list_messages(&thread).unwrap().len(), 3, "no new messages");
}

#[tokio::test]
async fn retry_on_empty_thread_is_an_error() {
    let dir = TempDir::new().unwrap();
    let council = council_at(&dir);
    let thread = council
        .store()
        .create_thread(&["a".to_string()], Phase::Council)
        .unwrap();

    let cancel = CancellationToken::new();
    let err = council.retry(&thread, false, &cancel, None).await.unwrap_err();
    assert!(matches!(err, CouncilError::EmptyThread));
}

#[tokio::test]
async fn retry_ignores_members_outside_the_to_header() {
    // The human asked only "a"; "b" never being expected means a turn
    // where "a" answered is complete.
    let dir = TempDir::new().unwrap();
    let council = council_at(&dir);
    let members = vec!["a".to_string(), "b".to_string()];
    let thread = council.store().create_thread(&members, Phase::Council).unwrap();
    council
        .store()
        .add_message(
            &thread,
            &MessageDraft::new(
                HUMAN_SENDER,
                Recipients::Named(vec!["a".to_string()]),
                "only a",
            ),
        )
        .unwrap();
    council
        .store()
        .add_message(&thread, &MessageDraft::new("a", Recipients::All, "done"))
        .unwrap();

    let cancel = CancellationToken::new();
    let responses = council.retry(&thread, false, &cancel, None).await.unwrap();
    assert!(responses.is_empty());
}
