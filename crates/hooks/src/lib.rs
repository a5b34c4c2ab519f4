// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Repository hook discovery and dispatch.
//!
//! A *hook* is an external command triggered for a named lifecycle
//! event (e.g. `pre-commit`). Hooks come from two sources: named hooks
//! declared in configuration as `hook.<name>.command` /
//! `hook.<name>.event` pairs, and a single default hook stored as an
//! executable file named after the event in the repository's hooks
//! directory. [`HookHost`] enumerates the hooks applicable to an event
//! in a deterministic order, decides how many may run concurrently, and
//! aggregates their results into one outcome.
//!
//! Child processes are spawned and multiplexed by the
//! [`hookline-parallel`](hookline_parallel) runner.

mod config;
mod jobs;
mod list;
mod locator;
mod run;
mod task;

pub use config::{ConfigError, ConfigSet, HookDef, HookSettings};
pub use list::HookEntry;
pub use locator::HookLocator;
pub use run::{
    CopyPayloadFn, HookError, HookHost, ReleasePayloadFn, RunHooksOpt, RunOutcome,
};

// Stdin feeding types shared with the parallel runner.
pub use hookline_parallel::{FeedFn, TaskPayload};
