// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem hook discovery.
//!
//! The default hook for an event is an executable file named after the
//! event inside the repository's hooks directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Platform suffix tried when the plain hook name is not executable.
#[cfg(windows)]
const HOOK_SUFFIX: &str = ".exe";

/// Resolves the filesystem-resident hook for an event.
#[derive(Debug)]
pub struct HookLocator {
    hooks_dir: Option<PathBuf>,
    advice_ignored_hook: bool,
    /// Event names an "ignored hook" advisory was already emitted for.
    advised: Mutex<HashSet<String>>,
}

impl HookLocator {
    /// Locator for a repository with the given hooks directory.
    pub fn new(hooks_dir: impl Into<PathBuf>) -> Self {
        Self {
            hooks_dir: Some(hooks_dir.into()),
            advice_ignored_hook: true,
            advised: Mutex::new(HashSet::new()),
        }
    }

    /// Locator with no hook storage at all; every lookup reports absent.
    pub fn detached() -> Self {
        Self {
            hooks_dir: None,
            advice_ignored_hook: false,
            advised: Mutex::new(HashSet::new()),
        }
    }

    /// Enable or disable the "hook was ignored" advisory.
    pub fn with_advice(mut self, enabled: bool) -> Self {
        self.advice_ignored_hook = enabled;
        self
    }

    /// The configured hooks directory, if any.
    pub fn hooks_dir(&self) -> Option<&Path> {
        self.hooks_dir.as_deref()
    }

    /// Resolve the executable hook file for `event`.
    ///
    /// A file that exists but is not executable counts as absent; the
    /// first such lookup per event name emits an advisory on stderr.
    pub fn find_hook(&self, event: &str) -> Option<PathBuf> {
        let dir = self.hooks_dir.as_ref()?;
        let path = dir.join(event);
        let plain = probe(&path);
        if matches!(plain, Probe::Executable) {
            return Some(path);
        }

        #[cfg(windows)]
        {
            let mut alt = path.clone().into_os_string();
            alt.push(HOOK_SUFFIX);
            let alt = PathBuf::from(alt);
            if matches!(probe(&alt), Probe::Executable) {
                return Some(alt);
            }
            // The suffix retry failed too; report on the plain name.
        }

        if matches!(plain, Probe::NotExecutable) {
            self.advise_ignored(event, &path);
        }
        None
    }

    fn advise_ignored(&self, event: &str, path: &Path) {
        if !self.advice_ignored_hook {
            return;
        }
        if !self.advised.lock().insert(event.to_string()) {
            return;
        }
        eprintln!(
            "hint: the '{}' hook was ignored because it is not set as executable",
            path.display()
        );
    }

    #[cfg(test)]
    pub(crate) fn advised_events(&self) -> usize {
        self.advised.lock().len()
    }
}

enum Probe {
    Executable,
    NotExecutable,
    Missing,
}

fn probe(path: &Path) -> Probe {
    let Ok(metadata) = std::fs::metadata(path) else {
        return Probe::Missing;
    };
    if !metadata.is_file() {
        return Probe::Missing;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Probe::NotExecutable;
        }
    }
    Probe::Executable
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
