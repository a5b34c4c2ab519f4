// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel child-process execution.
//!
//! This crate runs a stream of child-process tasks with bounded
//! concurrency: given a task source, a job count, and completion
//! callbacks, it keeps up to N children running at once, calls back on
//! each start failure and each completion, and preserves dispatch order
//! (though not necessarily completion order).

mod runner;
mod task;

pub use runner::{run_tasks, RunTasksOpts, TaskStream};
pub use task::{ChildTask, FeedFn, FeedSource, PayloadSlot, StdinSource, TaskPayload};
