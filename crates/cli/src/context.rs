// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared command context: resolved state dir, branch, and loaded config.
//!
//! Every command goes through `CliContext::load()`, which is also where
//! the hard contract lives: a `ConfigError` is caught here and rendered
//! as a single-line exit-1 diagnostic, for `status` and `show` just as
//! much as for `ask`.

use crate::env;
use crate::exit_error::ExitError;
use kd_config::Config;
use kd_core::Phase;
use kd_council::{Council, PeasantHarness};
use kd_store::{SessionStore, StateLayout, ThreadStore};
use std::path::PathBuf;

pub struct CliContext {
    pub layout: StateLayout,
    pub branch: String,
    pub config: Config,
}

impl CliContext {
    pub fn load() -> Result<Self, ExitError> {
        let layout = StateLayout::new(env::state_dir());
        let branch = env::current_branch();
        let config = kd_config::load(layout.root())?;
        Ok(Self { layout, branch, config })
    }

    /// Load with an explicit state dir and branch (the worker path).
    pub fn load_at(state_dir: PathBuf, branch: String) -> Result<Self, ExitError> {
        let layout = StateLayout::new(state_dir);
        let config = kd_config::load(layout.root())?;
        Ok(Self { layout, branch, config })
    }

    pub fn thread_store(&self) -> ThreadStore {
        ThreadStore::for_branch(&self.layout, &self.branch)
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::for_branch(&self.layout, &self.branch)
    }

    /// The directory member children run in: the project root owning the
    /// state directory.
    pub fn workdir(&self) -> PathBuf {
        self.layout
            .root()
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn council(&self, phase: Phase) -> Council {
        Council::new(
            self.config.clone(),
            self.thread_store(),
            self.session_store(),
            self.workdir(),
            phase,
        )
    }

    pub fn peasant_harness(&self, workdir: PathBuf) -> PeasantHarness {
        PeasantHarness::new(
            self.config.clone(),
            self.thread_store(),
            self.session_store(),
            workdir,
        )
    }

    /// Declared members of a thread, falling back to the configured
    /// council when the metadata hint is missing.
    pub fn declared_members(
        &self,
        store: &ThreadStore,
        thread: &kd_core::ThreadId,
    ) -> Result<Vec<String>, ExitError> {
        Ok(match store.read_meta(thread)? {
            Some(meta) => meta.members,
            None => self.config.council.members.clone(),
        })
    }
}
