// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch loop: live observation of one thread.
//!
//! Polls the thread directory and every expected member's stream file,
//! emitting normalized events to a callback. Resilient to stream files
//! shrinking (a retry truncated them) or disappearing (the final message
//! is imminent); never advances its byte offset across an incomplete
//! line, so partial JSON at end-of-read is simply picked up next tick.

use crate::agent_config::AgentConfig;
use crate::error::CouncilError;
use kd_backend::ExtractFrameFn;
use kd_config::Config;
use kd_core::{Message, StreamFrame, ThreadId};
use kd_store::{derive_status, LivenessHint, StoreError, ThreadStore};
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One observed event.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// A new message file appeared in the thread.
    Message(Message),
    /// One normalized frame from a member's live stream.
    Frame { member: String, frame: StreamFrame },
}

/// Why the watch returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Every expected responder has a terminal message in the current turn.
    Complete,
    /// The deadline elapsed first.
    TimedOut,
}

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Tail a thread until the turn completes or the timeout elapses.
pub async fn watch_thread(
    config: &Config,
    store: &ThreadStore,
    thread: &ThreadId,
    expected: &[String],
    options: WatchOptions,
    mut on_event: impl FnMut(WatchEvent),
) -> Result<WatchOutcome, CouncilError> {
    store.require(thread)?;

    // Per-member stream geometry, resolved once.
    let mut tails: Vec<(String, ExtractFrameFn, PathBuf)> = Vec::with_capacity(expected.len());
    for member in expected {
        let agent = AgentConfig::resolve(config, member)?;
        let path = store.stream_path(thread, member, agent.family.stream_ext());
        tails.push((member.clone(), agent.family.extract_stream_frame, path));
    }

    let mut offsets: HashMap<String, u64> = HashMap::new();
    let mut last_seq = 0u32;
    let deadline = tokio::time::Instant::now() + options.timeout;

    loop {
        for (member, extract, path) in &tails {
            let offset = offsets.entry(member.clone()).or_insert(0);
            match std::fs::metadata(path) {
                Err(_) => {
                    // Stream gone: the runner persisted the final message
                    // (or is about to). Forget the offset in case a retry
                    // recreates the file.
                    *offset = 0;
                }
                Ok(meta) => {
                    if meta.len() < *offset {
                        // Truncated or replaced underneath us.
                        *offset = 0;
                    }
                    if meta.len() > *offset {
                        if let Ok(consumed) = read_complete_lines(path, *offset, |line| {
                            if let Some(frame) = extract(line) {
                                on_event(WatchEvent::Frame {
                                    member: member.clone(),
                                    frame,
                                });
                            }
                        }) {
                            *offset += consumed;
                        }
                    }
                }
            }
        }

        match store.list_messages(thread) {
            Ok(messages) => {
                for message in &messages {
                    if message.seq > last_seq {
                        last_seq = message.seq;
                        on_event(WatchEvent::Message(message.clone()));
                    }
                }
                let statuses = derive_status(&messages, expected, |_| LivenessHint::Live);
                let done = !statuses.is_empty()
                    && expected
                        .iter()
                        .all(|m| statuses.get(m).is_some_and(|s| s.is_terminal()));
                if done {
                    return Ok(WatchOutcome::Complete);
                }
            }
            // A message file caught mid-write parses clean next tick.
            Err(StoreError::Message { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        if tokio::time::Instant::now() >= deadline {
            return Ok(WatchOutcome::TimedOut);
        }
        tokio::time::sleep(options.poll_interval).await;
    }
}

/// Read complete lines starting at `offset`, returning how many bytes of
/// complete lines were consumed. Trailing bytes with no newline stay
/// unread until more arrive.
fn read_complete_lines(
    path: &Path,
    offset: u64,
    mut on_line: impl FnMut(&str),
) -> std::io::Result<u64> {
    let mut file = std::fs::File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;

    let Some(last_newline) = buf.iter().rposition(|b| *b == b'\n') else {
        return Ok(0);
    };
    for line in buf[..=last_newline].split(|b| *b == b'\n') {
        if line.is_empty() {
            continue;
        }
        on_line(&String::from_utf8_lossy(line));
    }
    Ok(last_newline as u64 + 1)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
