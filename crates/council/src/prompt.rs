// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt composition.
//!
//! Final prompts are a fixed concatenation: safety preamble (owned by
//! code, never configurable), effective phase prompt (agent override if
//! set, else global), persona, user prompt. Each span is independent;
//! changing one input changes exactly its own span.

use crate::agent_config::AgentConfig;
use kd_config::{effective_phase_prompt, Config};
use kd_core::Phase;

/// Hard-coded preamble prepended to every composed prompt. Config cannot
/// override or remove it.
pub const SAFETY_PREAMBLE: &str = "You are one member of a council of independent advisors. \
Answer from your own judgment; do not coordinate with or speak for other members. \
Never run destructive commands against the user's repository or system.";

/// Concatenate the four spans in fixed order, newline-separated.
///
/// Empty spans keep their separator so the shape is stable regardless of
/// which inputs are configured.
pub fn compose_prompt(safety: &str, phase_prompt: &str, persona: &str, user: &str) -> String {
    [safety, phase_prompt, persona, user].join("\n")
}

/// Compose the final prompt for one agent in one phase.
///
/// The override-else-global phase lookup lives in `kd-config`; this is
/// its only production call site.
pub fn compose_for_agent(
    config: &Config,
    agent: &AgentConfig,
    phase: Phase,
    user: &str,
) -> String {
    let phase_prompt = effective_phase_prompt(config, &agent.name, phase).unwrap_or("");
    let persona = agent.persona.as_deref().unwrap_or("");
    compose_prompt(SAFETY_PREAMBLE, phase_prompt, persona, user)
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
