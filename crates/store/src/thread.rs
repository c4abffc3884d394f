// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only thread directories.
//!
//! A thread is a directory of numbered message files plus a metadata hint.
//! Sequence numbers are claimed by exclusive file creation: list, compute
//! next, `create_new`, retry on `AlreadyExists` with the number recomputed.
//! No locks; the retry loop is the only cross-process serialization for
//! message appends.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use kd_core::{message_file_name, parse_file_name, Message, Phase, Recipients, ThreadId};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Metadata hint written at thread creation. Non-authoritative: the
/// message files are the source of truth and this file is regeneratable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMeta {
    pub members: Vec<String>,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
}

/// One row of `list_threads` output.
#[derive(Debug, Clone)]
pub struct ThreadSummary {
    pub id: ThreadId,
    pub meta: Option<ThreadMeta>,
    pub message_count: usize,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields of a message to append; sequence number and timestamp are
/// assigned at write time.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub from: String,
    pub to: Recipients,
    pub refs: Vec<String>,
    pub extra: Vec<(String, String)>,
    pub body: String,
}

impl MessageDraft {
    pub fn new(from: impl Into<String>, to: Recipients, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to,
            refs: Vec::new(),
            extra: Vec::new(),
            body: body.into(),
        }
    }
}

/// Metadata file name inside a thread directory.
pub const THREAD_META_FILE: &str = "thread.json";

/// Bound on `add_message` exclusive-create retries.
pub const MAX_ADD_ATTEMPTS: u32 = 12;

/// Bound on slug-collision retries in `create_thread`.
const MAX_SLUG_ATTEMPTS: u32 = 10;

/// Thread storage for one branch.
#[derive(Debug, Clone)]
pub struct ThreadStore {
    threads_dir: PathBuf,
    archive_dir: PathBuf,
}

impl ThreadStore {
    pub fn new(threads_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self { threads_dir: threads_dir.into(), archive_dir: archive_dir.into() }
    }

    /// Build from a [`crate::StateLayout`] and branch name.
    pub fn for_branch(layout: &crate::StateLayout, branch: &str) -> Self {
        Self::new(layout.threads_dir(branch), layout.archive_dir(branch))
    }

    /// Allocate a fresh thread directory and write its metadata hint.
    pub fn create_thread(&self, members: &[String], phase: Phase) -> Result<ThreadId, StoreError> {
        std::fs::create_dir_all(&self.threads_dir)?;
        for _ in 0..MAX_SLUG_ATTEMPTS {
            let id = ThreadId::generate();
            match std::fs::create_dir(self.threads_dir.join(id.as_str())) {
                Ok(()) => {
                    let meta = ThreadMeta {
                        members: members.to_vec(),
                        phase,
                        created_at: Utc::now(),
                    };
                    self.write_meta(&id, &meta)?;
                    tracing::debug!(thread = %id, ?members, %phase, "thread created");
                    return Ok(id);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        // Ten straight collisions on a random slug means the RNG is broken,
        // not the directory; surface it as the IO error it is.
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "could not allocate a fresh thread slug",
        )))
    }

    /// Directory of a thread, without checking existence.
    pub fn thread_root(&self, id: &ThreadId) -> PathBuf {
        self.threads_dir.join(id.as_str())
    }

    /// Directory of a thread; error if it does not exist.
    pub fn require(&self, id: &ThreadId) -> Result<PathBuf, StoreError> {
        let dir = self.thread_root(id);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::ThreadNotFound { thread: id.clone() })
        }
    }

    pub fn read_meta(&self, id: &ThreadId) -> Result<Option<ThreadMeta>, StoreError> {
        let path = self.thread_root(id).join(THREAD_META_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text).ok()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write_meta(&self, id: &ThreadId, meta: &ThreadMeta) -> Result<(), StoreError> {
        let path = self.thread_root(id).join(THREAD_META_FILE);
        std::fs::write(path, serde_json::to_string_pretty(meta)?)?;
        Ok(())
    }

    /// Append a message, assigning the next dense sequence number.
    ///
    /// Atomic across processes: the composed file name is claimed with
    /// `create_new`, and on `AlreadyExists` the number is recomputed after
    /// a short backoff. Exhausting the bound raises [`StoreError::Collision`].
    pub fn add_message(&self, id: &ThreadId, draft: &MessageDraft) -> Result<u32, StoreError> {
        let dir = self.require(id)?;
        for attempt in 0..MAX_ADD_ATTEMPTS {
            let seq = next_seq(&dir)?;
            let message = Message {
                seq,
                from: draft.from.clone(),
                to: draft.to.clone(),
                timestamp: Utc::now(),
                refs: draft.refs.clone(),
                extra: draft.extra.clone(),
                body: draft.body.clone(),
            };
            let path = dir.join(message_file_name(seq, &draft.from));
            match std::fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(message.render().as_bytes())?;
                    file.sync_all()?;
                    return Ok(seq);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::trace!(thread = %id, seq, attempt, "sequence contested, retrying");
                    std::thread::sleep(Duration::from_millis(2 * u64::from(attempt) + 1));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(StoreError::Collision { thread: id.clone(), attempts: MAX_ADD_ATTEMPTS })
    }

    /// All messages, sorted strictly by sequence number.
    pub fn list_messages(&self, id: &ThreadId) -> Result<Vec<Message>, StoreError> {
        let dir = self.require(id)?;
        let mut messages = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some((seq, _sender)) = parse_file_name(name) else { continue };
            let content = std::fs::read_to_string(entry.path())?;
            let message = Message::parse(seq, &content).map_err(|source| {
                StoreError::Message { file: name.to_string(), source }
            })?;
            messages.push(message);
        }
        messages.sort_by_key(|m| m.seq);
        Ok(messages)
    }

    /// Path of a member's transient stream file.
    pub fn stream_path(&self, id: &ThreadId, member: &str, ext: &str) -> PathBuf {
        self.thread_root(id)
            .join(format!(".stream-{}.{}", kd_core::sanitize_sender(member), ext))
    }

    /// Remove a member's stream file if present.
    pub fn remove_stream(&self, id: &ThreadId, member: &str, ext: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.stream_path(id, member, ext)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Summaries of every thread on this branch, newest first.
    pub fn list_threads(&self) -> Result<Vec<ThreadSummary>, StoreError> {
        let mut summaries = Vec::new();
        let entries = match std::fs::read_dir(&self.threads_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(summaries),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let id = ThreadId::new(name);
            let mut message_count = 0usize;
            let mut updated_at: Option<DateTime<Utc>> = None;
            for file in std::fs::read_dir(entry.path())? {
                let file = file?;
                let file_name = file.file_name();
                let Some(file_name) = file_name.to_str() else { continue };
                if parse_file_name(file_name).is_none() {
                    continue;
                }
                message_count += 1;
                if let Ok(modified) = file.metadata().and_then(|m| m.modified()) {
                    let modified: DateTime<Utc> = modified.into();
                    if updated_at.map_or(true, |cur| modified > cur) {
                        updated_at = Some(modified);
                    }
                }
            }
            summaries.push(ThreadSummary {
                meta: self.read_meta(&id)?,
                id,
                message_count,
                updated_at,
            });
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    /// Move a whole thread under the archive directory. The only
    /// sanctioned way a thread's message files ever go away.
    pub fn archive_thread(&self, id: &ThreadId) -> Result<PathBuf, StoreError> {
        let dir = self.require(id)?;
        std::fs::create_dir_all(&self.archive_dir)?;
        let target = self.archive_dir.join(id.as_str());
        std::fs::rename(&dir, &target)?;
        tracing::debug!(thread = %id, "thread archived");
        Ok(target)
    }
}

/// Next free sequence number in a thread directory.
fn next_seq(dir: &Path) -> Result<u32, StoreError> {
    let mut max = 0u32;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some((seq, _)) = name.to_str().and_then(parse_file_name) {
            max = max.max(seq);
        }
    }
    Ok(max + 1)
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod tests;
