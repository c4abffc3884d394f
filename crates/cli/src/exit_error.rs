// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.
//! Codes: 1 user/validation (config included), 2 agent failure, 124 timeout.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A user or validation mistake.
    pub fn user(message: impl Into<String>) -> Self {
        Self::new(1, message)
    }

    /// An agent failure surfaced to the user.
    pub fn agent_failure(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// A timeout, using the conventional shell timeout code.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(124, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<kd_config::ConfigError> for ExitError {
    fn from(e: kd_config::ConfigError) -> Self {
        ExitError::user(format!("config error: {}", e))
    }
}

impl From<kd_council::CouncilError> for ExitError {
    fn from(e: kd_council::CouncilError) -> Self {
        match e {
            kd_council::CouncilError::Config(inner) => inner.into(),
            other => ExitError::user(other.to_string()),
        }
    }
}

impl From<kd_store::StoreError> for ExitError {
    fn from(e: kd_store::StoreError) -> Self {
        ExitError::user(e.to_string())
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
