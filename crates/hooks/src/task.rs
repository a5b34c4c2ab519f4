// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-hook task generation and result aggregation.
//!
//! [`HookTasks`] is the cursor over one run's hook list: each pull from
//! the parallel runner builds the child-process descriptor for the entry
//! at the cursor and advances it. The same object collects the per-task
//! outcomes into the run's aggregate result.

use std::ffi::OsString;
use std::fs::File;
use std::sync::Arc;

use hookline_parallel::{ChildTask, FeedSource, PayloadSlot, StdinSource, TaskStream};

use crate::config::ConfigSet;
use crate::list::HookEntry;
use crate::locator::HookLocator;
use crate::run::{HookError, RunHooksOpt};

pub(crate) struct HookTasks<'a> {
    event: &'a str,
    config: &'a ConfigSet,
    locator: &'a HookLocator,
    options: &'a RunHooksOpt,
    list: &'a [HookEntry],
    /// Eagerly cloned per-task payloads, one slot per list entry.
    slots: &'a [PayloadSlot],
    cursor: usize,
    /// Bitwise OR of every per-task start-failure and exit signal.
    rc: i32,
    invoked: bool,
}

impl<'a> HookTasks<'a> {
    pub(crate) fn new(
        event: &'a str,
        config: &'a ConfigSet,
        locator: &'a HookLocator,
        options: &'a RunHooksOpt,
        list: &'a [HookEntry],
        slots: &'a [PayloadSlot],
    ) -> Self {
        Self {
            event,
            config,
            locator,
            options,
            list,
            slots,
            cursor: 0,
            rc: 0,
            invoked: false,
        }
    }

    pub(crate) fn rc(&self) -> i32 {
        self.rc
    }

    pub(crate) fn invoked(&self) -> bool {
        self.invoked
    }

    fn build_task(&self, entry: &HookEntry, index: usize) -> Result<ChildTask, HookError> {
        let mut task = ChildTask::new(entry.name());
        task.env = self.options.env.clone();
        task.stdout_to_stderr = self.options.stdout_to_stderr;
        task.dir = self.options.dir.clone();

        assert!(
            self.options.path_to_stdin.is_none() || self.options.feed_pipe.is_none(),
            "path_to_stdin and feed_pipe are mutually exclusive"
        );
        if let Some(path) = &self.options.path_to_stdin {
            // Reopened per child; the runner closes it once the child exits.
            let file = File::open(path).map_err(|source| HookError::StdinOpen {
                path: path.clone(),
                source,
            })?;
            task.stdin = StdinSource::File(file);
        } else if let Some(feed) = &self.options.feed_pipe {
            task.stdin = StdinSource::Pipe(FeedSource {
                feed: Arc::clone(feed),
                payload: Arc::clone(&self.slots[index]),
            });
        }

        match entry {
            HookEntry::Default => {
                let Some(hook_path) = self.locator.find_hook(self.event) else {
                    unreachable!("hooks directory entry listed but hook no longer present");
                };
                // A relative hook path must survive the directory change.
                let hook_path = if self.options.dir.is_some() {
                    std::path::absolute(&hook_path)
                        .map_err(|err| HookError::Io(err.to_string()))?
                } else {
                    hook_path
                };
                task.args.push(hook_path.into_os_string());
            }
            HookEntry::Named(name) => {
                // Config-specified hooks run in a shell so one-liners work.
                task.use_shell = true;
                let key = format!("hook.{name}.command");
                let Some(command) = self.config.string(&key) else {
                    return Err(HookError::CommandNotConfigured { name: name.clone() });
                };
                task.args.push(OsString::from(command));
            }
        }

        task.args
            .extend(self.options.args.iter().map(OsString::from));
        assert!(!task.args.is_empty(), "hook must have at least one argument");

        Ok(task)
    }
}

impl TaskStream for HookTasks<'_> {
    type Error = HookError;

    fn next_task(&mut self) -> Result<Option<ChildTask>, HookError> {
        let Some(entry) = self.list.get(self.cursor) else {
            return Ok(None);
        };
        let index = self.cursor;
        self.cursor += 1;
        self.build_task(entry, index).map(Some)
    }

    fn start_failure(&mut self, label: &str) {
        self.rc |= 1;
        if label.is_empty() {
            eprintln!("couldn't start hook from the hooks directory");
        } else {
            eprintln!("couldn't start hook '{label}'");
        }
    }

    fn task_finished(&mut self, _label: &str, code: i32) {
        self.rc |= code;
        self.invoked = true;
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
