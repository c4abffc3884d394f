// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config error type.
//!
//! A missing file is not an error (the loader returns the empty default);
//! everything else is, and commands render it as a single diagnostic line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// All validation findings, collected in one pass where feasible.
    #[error("invalid config: {}", issues.join("; "))]
    Invalid { issues: Vec<String> },
}

impl ConfigError {
    pub fn invalid(issues: Vec<String>) -> Self {
        ConfigError::Invalid { issues }
    }
}
