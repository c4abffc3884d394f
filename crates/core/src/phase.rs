// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow phases.
//!
//! Phases form a closed set; prompt overrides in the config are keyed by
//! phase name and any other name is a config error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The phase a council run (or peasant iteration) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Council,
    Design,
    Review,
    Peasant,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Council, Phase::Design, Phase::Review, Phase::Peasant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Council => "council",
            Phase::Design => "design",
            Phase::Review => "review",
            Phase::Peasant => "peasant",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for an unrecognized phase name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown phase {0:?}, expected one of: council, design, review, peasant")]
pub struct PhaseParseError(pub String);

impl FromStr for Phase {
    type Err = PhaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "council" => Ok(Phase::Council),
            "design" => Ok(Phase::Design),
            "review" => Ok(Phase::Review),
            "peasant" => Ok(Phase::Peasant),
            other => Err(PhaseParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
