// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide backend-family dispatch table.

use crate::family::BackendFamily;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static REGISTRY: OnceLock<BTreeMap<&'static str, BackendFamily>> = OnceLock::new();

/// The registered families, keyed by name.
pub fn registry() -> &'static BTreeMap<&'static str, BackendFamily> {
    REGISTRY.get_or_init(|| {
        let mut map = BTreeMap::new();
        for family in [
            crate::claude::family(),
            crate::codex::family(),
            crate::cursor::family(),
        ] {
            map.insert(family.name, family);
        }
        map
    })
}

/// Look up one family by name.
pub fn family(name: &str) -> Option<&'static BackendFamily> {
    registry().get(name)
}

/// Names of every registered family, sorted.
pub fn family_names() -> Vec<&'static str> {
    registry().keys().copied().collect()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
