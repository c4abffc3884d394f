// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config loading and deep validation.
//!
//! One JSON document (`config.json` in the state directory) names the
//! agents, the council, the peasant, and the phase prompts. Validation is
//! exhaustive and unforgiving: unknown keys at any depth are fatal and
//! reported by their full dotted path, because a silently ignored typo
//! ("timout") is the most expensive class of user mistake.

mod error;
mod load;
mod schema;

pub use error::ConfigError;
pub use load::{load, load_path, parse, CONFIG_FILE};
pub use schema::{
    effective_phase_prompt, AgentDef, Config, CouncilConfig, PeasantConfig,
    DEFAULT_COUNCIL_TIMEOUT, DEFAULT_PEASANT_ITERATIONS, DEFAULT_PEASANT_TIMEOUT,
};
