// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend availability probing.
//!
//! The first run against a family executes its version probe; the result
//! is cached for the life of the process. A failed probe turns into a
//! per-member error carrying the family's install hint, so one missing
//! vendor CLI never takes down the rest of the council.

use kd_backend::BackendFamily;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::OnceLock;

static PROBE_CACHE: OnceLock<Mutex<HashMap<&'static str, Result<(), String>>>> = OnceLock::new();

fn cache() -> &'static Mutex<HashMap<&'static str, Result<(), String>>> {
    PROBE_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Check (once per process) that a family's vendor CLI answers its
/// version probe. Returns a human-renderable reason on failure.
pub(crate) async fn ensure_available(family: &BackendFamily) -> Result<(), String> {
    if let Some(result) = cache().lock().get(family.name) {
        return result.clone();
    }
    let result = run_probe(family.version_probe).await.map_err(|reason| {
        format!("{} ({})", reason, family.install_hint)
    });
    cache().lock().insert(family.name, result.clone());
    if let Err(reason) = &result {
        tracing::warn!(family = family.name, reason, "backend unavailable");
    }
    result
}

/// Run one probe argv to completion, discarding output.
async fn run_probe(argv: &[&str]) -> Result<(), String> {
    let Some((program, args)) = argv.split_first() else {
        return Err("empty version probe".to_string());
    };
    let status = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("version probe failed with {}", status)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("{} is not on PATH", program))
        }
        Err(e) => Err(format!("version probe error: {}", e)),
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
