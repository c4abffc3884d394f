// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration model.

use indexmap::IndexMap;
use kd_core::Phase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default council timeout in seconds.
pub const DEFAULT_COUNCIL_TIMEOUT: u64 = 600;
/// Default peasant per-iteration timeout in seconds.
pub const DEFAULT_PEASANT_TIMEOUT: u64 = 3600;
/// Default cap on peasant iterations.
pub const DEFAULT_PEASANT_ITERATIONS: u32 = 10;

/// One named agent as declared in config. Everything except the backend
/// family is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDef {
    /// Backend family name; must be registered.
    pub backend: String,
    /// Vendor model identifier, passed through when the family supports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Persona prompt, merged into every composed prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Per-phase prompt overrides.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prompts: BTreeMap<Phase, String>,
    /// Extra CLI arguments appended after the base argv.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

impl AgentDef {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            model: None,
            prompt: None,
            prompts: BTreeMap::new(),
            extra_args: Vec::new(),
        }
    }

    /// This agent's override for `phase`, if any.
    pub fn phase_override(&self, phase: Phase) -> Option<&str> {
        self.prompts.get(&phase).map(String::as_str)
    }
}

/// Council section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilConfig {
    /// Agent names consulted by default.
    pub members: Vec<String>,
    /// Per-member timeout in seconds.
    pub timeout: u64,
    /// Cap on concurrent member runs; default is the member count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,
    /// Seconds without stream growth before a running member is reported
    /// stalled; absent disables stalled detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stalled_after: Option<u64>,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            timeout: DEFAULT_COUNCIL_TIMEOUT,
            parallelism: None,
            stalled_after: None,
        }
    }
}

/// Peasant section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeasantConfig {
    /// Agent that executes tickets; must be declared in `agents`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Per-iteration timeout in seconds.
    pub timeout: u64,
    /// Hard cap on iterations per ticket.
    pub max_iterations: u32,
}

impl Default for PeasantConfig {
    fn default() -> Self {
        Self {
            agent: None,
            timeout: DEFAULT_PEASANT_TIMEOUT,
            max_iterations: DEFAULT_PEASANT_ITERATIONS,
        }
    }
}

/// The whole validated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    pub agents: IndexMap<String, AgentDef>,
    /// Global phase prompts, applied to agents without an override.
    pub prompts: BTreeMap<Phase, String>,
    pub council: CouncilConfig,
    pub peasant: PeasantConfig,
}

impl Config {
    pub fn agent(&self, name: &str) -> Option<&AgentDef> {
        self.agents.get(name)
    }

    /// The global prompt for `phase`, if configured.
    pub fn phase_prompt(&self, phase: Phase) -> Option<&str> {
        self.prompts.get(&phase).map(String::as_str)
    }
}

/// The phase prompt that applies to `agent` in `phase`: the agent's own
/// override when set, else the global phase prompt.
pub fn effective_phase_prompt<'a>(
    config: &'a Config,
    agent: &str,
    phase: Phase,
) -> Option<&'a str> {
    config
        .agent(agent)
        .and_then(|def| def.phase_override(phase))
        .or_else(|| config.phase_prompt(phase))
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
