// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-branch, per-agent session records.
//!
//! A record holds the vendor resume token, the pid of an in-flight run,
//! and activity timestamps. Mutation is read-modify-write under an
//! advisory exclusive lock on a sidecar file, committed by temp-file
//! rename so a crash mid-write never leaves a corrupt record. Losing a
//! session file is recoverable (the next run starts a fresh vendor
//! session); losing a thread file is not. Keep the two apart.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One agent's session bookkeeping on one branch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    pub resume_token: Option<String>,
    pub pid: Option<u32>,
    #[serde(default)]
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// Session storage for one branch.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build from a [`crate::StateLayout`] and branch name.
    pub fn for_branch(layout: &crate::StateLayout, branch: &str) -> Self {
        Self::new(layout.sessions_dir(branch))
    }

    fn record_path(&self, agent: &str) -> PathBuf {
        self.dir.join(format!("{}.json", kd_core::sanitize_sender(agent)))
    }

    fn lock_path(&self, agent: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", kd_core::sanitize_sender(agent)))
    }

    /// Read an agent's record, if one exists. Reads do not take the lock:
    /// the rename commit makes any observed file internally consistent.
    pub fn load(&self, agent: &str) -> Result<Option<SessionRecord>, StoreError> {
        match std::fs::read_to_string(self.record_path(agent)) {
            Ok(text) => Ok(serde_json::from_str(&text).ok()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read-modify-write an agent's record under the advisory lock.
    pub fn update(
        &self,
        agent: &str,
        patch: impl FnOnce(&mut SessionRecord),
    ) -> Result<SessionRecord, StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path(agent))?;
        lock_file.lock_exclusive()?;

        let mut record = self.load(agent)?.unwrap_or_default();
        patch(&mut record);
        record.last_activity_at = Some(Utc::now());

        let path = self.record_path(agent);
        let tmp = self.dir.join(format!(
            ".{}.tmp-{}",
            kd_core::sanitize_sender(agent),
            std::process::id()
        ));
        std::fs::write(&tmp, serde_json::to_string_pretty(&record)?)?;
        std::fs::rename(&tmp, &path)?;

        // The advisory lock releases when `lock_file` drops.
        Ok(record)
    }

    /// Forget an agent's session entirely. The next run starts a fresh
    /// vendor conversation.
    pub fn reset(&self, agent: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.record_path(agent)) {
            Ok(()) => {
                tracing::debug!(agent, "session reset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// True when `pid` names a live process we may signal.
pub fn pid_alive(pid: u32) -> bool {
    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), None).is_ok()
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
