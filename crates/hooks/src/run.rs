// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The hook run orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use hookline_parallel::{run_tasks, FeedFn, PayloadSlot, RunTasksOpts, TaskPayload};

use crate::config::{ConfigError, ConfigSet};
use crate::jobs;
use crate::list::{self, HookEntry};
use crate::locator::HookLocator;
use crate::task::HookTasks;

/// Produces one fresh payload per dispatched hook, so concurrent
/// children never share mutable state.
pub type CopyPayloadFn = Arc<dyn Fn() -> TaskPayload + Send + Sync>;

/// Releases a payload once its hook (or the whole run) is done.
pub type ReleasePayloadFn = Arc<dyn Fn(TaskPayload) + Send + Sync>;

/// Options for one hook run. Consumed by the run; build a fresh value
/// per invocation.
#[derive(Clone, Default)]
pub struct RunHooksOpt {
    /// Extra environment variables for every dispatched hook.
    pub env: Vec<(String, String)>,

    /// Extra trailing arguments appended to every hook invocation.
    pub args: Vec<String>,

    /// Explicit concurrency; 0 means derive it from configuration.
    pub jobs: u32,

    /// Redirect each hook's stdin from this file. Mutually exclusive
    /// with `feed_pipe`.
    pub path_to_stdin: Option<PathBuf>,

    /// Feed each hook's stdin through a runner-allocated pipe. Mutually
    /// exclusive with `path_to_stdin`.
    pub feed_pipe: Option<FeedFn>,

    /// Clone callback for per-task feed state; must be set together
    /// with `release_task_payload`.
    pub copy_task_payload: Option<CopyPayloadFn>,

    /// Release callback for per-task feed state.
    pub release_task_payload: Option<ReleasePayloadFn>,

    /// Merge hook stdout into the parent's stderr stream. Turning this
    /// off forces serial execution.
    pub stdout_to_stderr: bool,

    /// Working directory override for every hook.
    pub dir: Option<PathBuf>,

    /// Report an error when no hook exists for the event.
    pub error_if_missing: bool,
}

impl RunHooksOpt {
    /// Options for a parallel run; concurrency comes from configuration
    /// or the host CPU count.
    pub fn parallel() -> Self {
        Self {
            stdout_to_stderr: true,
            ..Self::default()
        }
    }

    /// Options for a strictly serial run.
    pub fn serial() -> Self {
        Self {
            jobs: 1,
            stdout_to_stderr: true,
            ..Self::default()
        }
    }

    pub fn with_env(mut self, env: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(env);
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_path_to_stdin(mut self, path: impl Into<PathBuf>) -> Self {
        self.path_to_stdin = Some(path.into());
        self
    }

    pub fn with_feed_pipe(mut self, feed: FeedFn) -> Self {
        self.feed_pipe = Some(feed);
        self
    }

    pub fn with_task_payload(mut self, copy: CopyPayloadFn, release: ReleasePayloadFn) -> Self {
        self.copy_task_payload = Some(copy);
        self.release_task_payload = Some(release);
        self
    }

    pub fn with_stdout_to_stderr(mut self, merge: bool) -> Self {
        self.stdout_to_stderr = merge;
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_error_if_missing(mut self, required: bool) -> Self {
        self.error_if_missing = required;
        self
    }
}

/// Aggregate outcome of one hook run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Bitwise OR of every per-hook start-failure and exit signal;
    /// 0 means every dispatched hook (if any) succeeded.
    pub code: i32,

    /// Whether at least one hook actually ran, whatever its result.
    pub invoked: bool,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// A repository's hook surface: configuration plus hook storage.
pub struct HookHost {
    config: ConfigSet,
    locator: HookLocator,
}

impl HookHost {
    pub fn new(config: ConfigSet, locator: HookLocator) -> Self {
        Self { config, locator }
    }

    pub fn config(&self) -> &ConfigSet {
        &self.config
    }

    /// Build the ordered hook list for `event`; see [`HookEntry`].
    pub fn list_hooks(&self, event: &str) -> Vec<HookEntry> {
        list::list_hooks(&self.config, &self.locator, event)
    }

    /// Resolve the filesystem hook for `event`, if any.
    pub fn find_hook(&self, event: &str) -> Option<PathBuf> {
        self.locator.find_hook(event)
    }

    /// Whether any hook (named or filesystem) applies to `event`.
    pub fn hook_exists(&self, event: &str) -> bool {
        !self.list_hooks(event).is_empty()
    }

    /// Run the hooks for `event` with default (parallel) options.
    pub async fn run_hooks(&self, event: &str) -> Result<RunOutcome, HookError> {
        self.run_hooks_opt(event, RunHooksOpt::parallel()).await
    }

    /// Run the hooks for `event` with extra trailing arguments.
    pub async fn run_hooks_args(
        &self,
        event: &str,
        args: impl IntoIterator<Item = String>,
    ) -> Result<RunOutcome, HookError> {
        self.run_hooks_opt(event, RunHooksOpt::parallel().with_args(args))
            .await
    }

    /// Run every hook applicable to `event`.
    ///
    /// Hooks are dispatched in list order, up to the computed job count
    /// at a time, and their results are OR'd into one aggregate. A
    /// missing command for a listed named hook aborts the run.
    pub async fn run_hooks_opt(
        &self,
        event: &str,
        options: RunHooksOpt,
    ) -> Result<RunOutcome, HookError> {
        assert!(
            options.path_to_stdin.is_none() || options.feed_pipe.is_none(),
            "path_to_stdin and feed_pipe are mutually exclusive"
        );
        assert!(
            options.copy_task_payload.is_some() == options.release_task_payload.is_some(),
            "copy_task_payload and release_task_payload must be set together"
        );

        let list = self.list_hooks(event);
        if list.is_empty() {
            if options.error_if_missing {
                return Err(HookError::NoHookFound {
                    event: event.to_string(),
                });
            }
            return Ok(RunOutcome::default());
        }

        let processes = jobs::hook_jobs(&self.config, &options)?;

        // One payload clone per entry, made before dispatch begins, so
        // concurrently running hooks each own an independent copy.
        let slots: Vec<PayloadSlot> = list
            .iter()
            .map(|_| {
                let payload = options.copy_task_payload.as_ref().map(|copy| copy());
                Arc::new(Mutex::new(payload))
            })
            .collect();

        let mut tasks = HookTasks::new(event, &self.config, &self.locator, &options, &list, &slots);
        let run = run_tasks(
            &RunTasksOpts {
                processes,
                // Serial runs may stream output immediately; there is no
                // interleaving risk.
                ungroup: processes == 1,
            },
            &mut tasks,
        )
        .await;

        if let Some(release) = &options.release_task_payload {
            for slot in &slots {
                if let Some(payload) = slot.lock().take() {
                    release(payload);
                }
            }
        }
        run?;

        Ok(RunOutcome {
            code: tasks.rc(),
            invoked: tasks.invoked(),
        })
    }
}

#[derive(Debug, Error)]
pub enum HookError {
    /// A hook declared an event but no command; the declaration implied
    /// a command that must exist.
    #[error("'hook.{name}.command' must be configured or 'hook.{name}.event' must be removed")]
    CommandNotConfigured { name: String },

    /// No hook applies to the event and the caller required one.
    #[error("cannot find a hook for event '{event}'")]
    NoHookFound { event: String },

    /// The configured stdin redirection file could not be opened.
    #[error("could not open hook stdin file {}: {source}", path.display())]
    StdinOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("hook I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
