// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kd_core::Phase;

fn config_with_override() -> Config {
    let mut config = Config::default();
    let mut agent = AgentDef::new("claude");
    agent.prompts.insert(Phase::Council, "LOCAL".to_string());
    config.agents.insert("a".to_string(), agent);
    config.agents.insert("b".to_string(), AgentDef::new("codex"));
    config.prompts.insert(Phase::Council, "GLOBAL".to_string());
    config
}

#[test]
fn override_beats_global() {
    let config = config_with_override();
    assert_eq!(effective_phase_prompt(&config, "a", Phase::Council), Some("LOCAL"));
    assert_eq!(effective_phase_prompt(&config, "b", Phase::Council), Some("GLOBAL"));
}

#[test]
fn no_prompt_configured_resolves_to_none() {
    let config = config_with_override();
    assert_eq!(effective_phase_prompt(&config, "a", Phase::Design), None);
    assert_eq!(effective_phase_prompt(&config, "missing", Phase::Design), None);
}

#[test]
fn defaults_are_sane() {
    let config = Config::default();
    assert_eq!(config.council.timeout, DEFAULT_COUNCIL_TIMEOUT);
    assert_eq!(config.peasant.timeout, DEFAULT_PEASANT_TIMEOUT);
    assert_eq!(config.peasant.max_iterations, DEFAULT_PEASANT_ITERATIONS);
    assert!(config.council.parallelism.is_none());
    assert!(config.council.stalled_after.is_none());
}
