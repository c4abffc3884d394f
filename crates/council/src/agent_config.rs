// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime agent configuration.
//!
//! The resolved union of a registered backend family's capability record
//! and the user's `AgentDef`. Unlike the config-layer form it is never
//! partial, and it is rebuilt from the two sources on every invocation.

use crate::error::CouncilError;
use kd_backend::BackendFamily;
use kd_config::Config;

/// One agent, ready to run.
///
/// Phase prompt overrides stay in the [`Config`]; composition consults
/// them through `kd-config`'s lookup rather than carrying a copy here.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub family: BackendFamily,
    pub model: Option<String>,
    pub persona: Option<String>,
    pub extra_args: Vec<String>,
}

impl AgentConfig {
    /// Resolve a named agent against the config and the family registry.
    pub fn resolve(config: &Config, name: &str) -> Result<Self, CouncilError> {
        let def = config
            .agent(name)
            .ok_or_else(|| CouncilError::UnknownAgent(name.to_string()))?;
        let family = kd_backend::family(&def.backend).ok_or_else(|| {
            CouncilError::UnknownFamily {
                agent: name.to_string(),
                family: def.backend.clone(),
            }
        })?;
        Ok(Self {
            name: name.to_string(),
            family: *family,
            model: def.model.clone(),
            persona: def.prompt.clone(),
            extra_args: def.extra_args.clone(),
        })
    }

    /// Build the full argv for one run.
    ///
    /// Family base (streaming variant when asked), then the resume pair,
    /// then the model, then agent extra args, then the prompt as the final
    /// positional.
    pub fn build_argv(&self, prompt: &str, resume: Option<&str>, streaming: bool) -> Vec<String> {
        let mut argv: Vec<String> = self
            .family
            .argv(streaming)
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        if let (Some(token), Some(flag)) = (resume, self.family.resume_flag) {
            argv.push(flag.to_string());
            argv.push(token.to_string());
        }
        if let Some(model) = &self.model {
            argv.push("--model".to_string());
            argv.push(model.clone());
        }
        argv.extend(self.extra_args.iter().cloned());
        argv.push(prompt.to_string());
        argv
    }
}

#[cfg(test)]
#[path = "agent_config_tests.rs"]
mod tests;
