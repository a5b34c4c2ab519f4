// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered hook list construction.

use std::fmt;

use crate::config::ConfigSet;
use crate::locator::HookLocator;

/// One runnable hook for an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookEntry {
    /// The filesystem hook from the hooks directory. It has no friendly
    /// name; its identity is the empty string.
    Default,
    /// A hook declared via `hook.<name>.command` / `hook.<name>.event`.
    Named(String),
}

impl HookEntry {
    /// Configuration name of the entry; empty for the default hook.
    pub fn name(&self) -> &str {
        match self {
            Self::Default => "",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for HookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("hooks directory"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Build the ordered hook list for `event`.
///
/// Named hooks appear in configuration declaration order; re-declaring a
/// name moves it to the end, so the last declaration wins both content
/// and position. The default hook, when present on disk, is always last.
pub(crate) fn list_hooks(
    config: &ConfigSet,
    locator: &HookLocator,
    event: &str,
) -> Vec<HookEntry> {
    assert!(!event.is_empty(), "empty hook event name");

    let mut names: Vec<&str> = Vec::new();
    for (key, value) in config.iter() {
        // Cheap rejection before parsing the key.
        if value != event {
            continue;
        }
        let Some(name) = hook_event_key(key) else {
            continue;
        };
        if let Some(prior) = names.iter().position(|n| *n == name) {
            names.remove(prior);
        }
        names.push(name);
    }

    let mut list: Vec<HookEntry> = names
        .into_iter()
        .map(|name| HookEntry::Named(name.to_string()))
        .collect();

    if locator.find_hook(event).is_some() {
        list.push(HookEntry::Default);
    }

    list
}

/// `hook.<name>.event` → `<name>`; anything else → `None`.
fn hook_event_key(key: &str) -> Option<&str> {
    key.strip_prefix("hook.")?
        .strip_suffix(".event")
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
