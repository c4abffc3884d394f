// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON config loading and exhaustive validation.
//!
//! The walk collects every finding it can reach before failing, so one
//! load reports one consolidated diagnostic. Structural damage (a section
//! that is not an object) short-circuits only the checks that depend on
//! that structure.

use crate::error::ConfigError;
use crate::schema::{AgentDef, Config, CouncilConfig, PeasantConfig};
use kd_core::Phase;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Config file name inside the state directory.
pub const CONFIG_FILE: &str = "config.json";

const ROOT_KEYS: &[&str] = &["agents", "prompts", "council", "peasant"];
const AGENT_KEYS: &[&str] = &["backend", "model", "prompt", "prompts", "extra_args"];
const COUNCIL_KEYS: &[&str] = &["members", "timeout", "parallelism", "stalled_after"];
const PEASANT_KEYS: &[&str] = &["agent", "timeout", "max_iterations"];

/// Load `config.json` from the state directory. A missing file is the
/// empty-but-valid default, never an error.
pub fn load(state_dir: &Path) -> Result<Config, ConfigError> {
    load_path(&state_dir.join(CONFIG_FILE))
}

/// Load a config document from an explicit path.
pub fn load_path(path: &Path) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// Parse and validate a config document.
pub fn parse(text: &str) -> Result<Config, ConfigError> {
    let root: Value = serde_json::from_str(text)?;
    let mut issues = Vec::new();
    let config = build(&root, &mut issues);
    if issues.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::invalid(issues))
    }
}

fn dotted(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn check_keys(obj: &Map<String, Value>, allowed: &[&str], path: &str, issues: &mut Vec<String>) {
    for key in obj.keys() {
        if !allowed.contains(&key.as_str()) {
            issues.push(format!("unknown key {}", dotted(path, key)));
        }
    }
}

fn as_object<'a>(
    value: &'a Value,
    path: &str,
    issues: &mut Vec<String>,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(obj) => Some(obj),
        None => {
            issues.push(format!("{} must be an object", path));
            None
        }
    }
}

fn expect_string(value: &Value, path: &str, issues: &mut Vec<String>) -> Option<String> {
    match value.as_str() {
        Some(s) => Some(s.to_string()),
        None => {
            issues.push(format!("{} must be a string", path));
            None
        }
    }
}

fn expect_positive_int(value: &Value, path: &str, issues: &mut Vec<String>) -> Option<u64> {
    match value.as_u64() {
        Some(n) if n > 0 => Some(n),
        _ => {
            issues.push(format!("{} must be a positive integer", path));
            None
        }
    }
}

fn expect_string_list(value: &Value, path: &str, issues: &mut Vec<String>) -> Option<Vec<String>> {
    let Some(items) = value.as_array() else {
        issues.push(format!("{} must be a list of strings", path));
        return None;
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(s) => out.push(s.to_string()),
            None => issues.push(format!("{}[{}] must be a string", path, i)),
        }
    }
    Some(out)
}

/// Parse a phase-keyed prompt map (`prompts` at root or per agent).
fn parse_phase_prompts(
    value: &Value,
    path: &str,
    issues: &mut Vec<String>,
) -> BTreeMap<Phase, String> {
    let mut out = BTreeMap::new();
    let Some(obj) = as_object(value, path, issues) else {
        return out;
    };
    for (key, prompt) in obj {
        let entry_path = dotted(path, key);
        match key.parse::<Phase>() {
            Ok(phase) => {
                if let Some(text) = expect_string(prompt, &entry_path, issues) {
                    out.insert(phase, text);
                }
            }
            Err(_) => issues.push(format!("unknown key {}", entry_path)),
        }
    }
    out
}

fn parse_agent(name: &str, value: &Value, issues: &mut Vec<String>) -> Option<AgentDef> {
    let path = format!("agents.{}", name);
    let obj = as_object(value, &path, issues)?;
    check_keys(obj, AGENT_KEYS, &path, issues);

    let backend = match obj.get("backend") {
        Some(v) => expect_string(v, &dotted(&path, "backend"), issues)?,
        None => {
            issues.push(format!("{}.backend is required", path));
            return None;
        }
    };
    let mut def = AgentDef::new(backend);
    if let Some(v) = obj.get("model") {
        def.model = expect_string(v, &dotted(&path, "model"), issues);
    }
    if let Some(v) = obj.get("prompt") {
        def.prompt = expect_string(v, &dotted(&path, "prompt"), issues);
    }
    if let Some(v) = obj.get("prompts") {
        def.prompts = parse_phase_prompts(v, &dotted(&path, "prompts"), issues);
    }
    if let Some(v) = obj.get("extra_args") {
        def.extra_args = expect_string_list(v, &dotted(&path, "extra_args"), issues)
            .unwrap_or_default();
    }
    Some(def)
}

fn parse_council(value: &Value, issues: &mut Vec<String>) -> CouncilConfig {
    let mut council = CouncilConfig::default();
    let Some(obj) = as_object(value, "council", issues) else {
        return council;
    };
    check_keys(obj, COUNCIL_KEYS, "council", issues);
    if let Some(v) = obj.get("members") {
        if let Some(members) = expect_string_list(v, "council.members", issues) {
            council.members = members;
        }
    }
    if let Some(v) = obj.get("timeout") {
        if let Some(n) = expect_positive_int(v, "council.timeout", issues) {
            council.timeout = n;
        }
    }
    if let Some(v) = obj.get("parallelism") {
        if let Some(n) = expect_positive_int(v, "council.parallelism", issues) {
            council.parallelism = Some(n as usize);
        }
    }
    if let Some(v) = obj.get("stalled_after") {
        council.stalled_after = expect_positive_int(v, "council.stalled_after", issues);
    }
    council
}

fn parse_peasant(value: &Value, issues: &mut Vec<String>) -> PeasantConfig {
    let mut peasant = PeasantConfig::default();
    let Some(obj) = as_object(value, "peasant", issues) else {
        return peasant;
    };
    check_keys(obj, PEASANT_KEYS, "peasant", issues);
    if let Some(v) = obj.get("agent") {
        peasant.agent = expect_string(v, "peasant.agent", issues);
    }
    if let Some(v) = obj.get("timeout") {
        if let Some(n) = expect_positive_int(v, "peasant.timeout", issues) {
            peasant.timeout = n;
        }
    }
    if let Some(v) = obj.get("max_iterations") {
        if let Some(n) = expect_positive_int(v, "peasant.max_iterations", issues) {
            peasant.max_iterations = n as u32;
        }
    }
    peasant
}

fn build(root: &Value, issues: &mut Vec<String>) -> Config {
    let mut config = Config::default();
    let Some(obj) = root.as_object() else {
        issues.push("config root must be an object".to_string());
        return config;
    };
    check_keys(obj, ROOT_KEYS, "", issues);

    if let Some(agents) = obj.get("agents") {
        if let Some(agents_obj) = as_object(agents, "agents", issues) {
            for (name, value) in agents_obj {
                if let Some(def) = parse_agent(name, value, issues) {
                    config.agents.insert(name.clone(), def);
                }
            }
        }
    }
    if let Some(prompts) = obj.get("prompts") {
        config.prompts = parse_phase_prompts(prompts, "prompts", issues);
    }
    if let Some(council) = obj.get("council") {
        config.council = parse_council(council, issues);
    }
    if let Some(peasant) = obj.get("peasant") {
        config.peasant = parse_peasant(peasant, issues);
    }

    // Cross-references, checked only once the structure above held up.
    let family_names = kd_backend::family_names();
    for (name, def) in &config.agents {
        if !family_names.contains(&def.backend.as_str()) {
            issues.push(format!(
                "agents.{}.backend: unknown backend family {:?}",
                name, def.backend
            ));
        }
    }
    for member in &config.council.members {
        if !config.agents.contains_key(member) {
            issues.push(format!(
                "council.members references undefined agent {:?}",
                member
            ));
        }
    }
    if let Some(agent) = &config.peasant.agent {
        if !config.agents.contains_key(agent) {
            issues.push(format!("peasant.agent references undefined agent {:?}", agent));
        }
    }

    config
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
