// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered key-value configuration store.
//!
//! Hooks are declared through `hook.<name>.command` / `hook.<name>.event`
//! key pairs. Declaration order is significant for hook ordering, so the
//! store keeps every declaration in the order it was added; lookups
//! return the most recent value for a key.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// An append-only, order-preserving configuration store.
#[derive(Clone, Debug, Default)]
pub struct ConfigSet {
    entries: Vec<(String, String)>,
}

impl ConfigSet {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration. Re-declaring a key keeps both entries;
    /// lookups see the later one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Most recent value declared for `key`.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Most recent value for `key`, parsed as a non-negative integer.
    pub fn uint(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        match self.string(key) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidUnsigned {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
        }
    }

    /// Every declaration, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Load hook declarations from a TOML settings document.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let settings: HookSettings = toml::from_str(document)?;
        Ok(settings.into_config())
    }

    /// Load hook declarations from a TOML settings file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&document)
    }
}

/// Settings-file form of hook configuration.
///
/// ```toml
/// jobs = 4
///
/// [[hook]]
/// name = "lint"
/// command = "cargo clippy"
/// event = "pre-commit"
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookSettings {
    /// Concurrency override; 0 or absent means no override.
    #[serde(default)]
    pub jobs: Option<u64>,

    /// Hook declarations, in file order.
    #[serde(default)]
    pub hook: Vec<HookDef>,
}

/// One declared hook.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookDef {
    pub name: String,
    pub command: String,
    pub event: String,
}

impl HookSettings {
    /// Flatten into `hook.<name>.command` / `hook.<name>.event` pairs,
    /// preserving file order.
    pub fn into_config(self) -> ConfigSet {
        let mut config = ConfigSet::new();
        if let Some(jobs) = self.jobs {
            config.set("hook.jobs", jobs.to_string());
        }
        for def in self.hook {
            config.set(format!("hook.{}.command", def.name), def.command);
            config.set(format!("hook.{}.event", def.name), def.event);
        }
        config
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid non-negative integer for '{key}': '{value}'")]
    InvalidUnsigned { key: String, value: String },

    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
