// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Child-process task descriptors.

use std::any::Any;
use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

/// Opaque per-task state handed to the stdin feed callback.
pub type TaskPayload = Box<dyn Any + Send>;

/// Shared slot holding a task's payload.
///
/// The slot is shared between the dispatching caller (which reclaims
/// unconsumed payloads after the run) and the runner's stdin feeder.
pub type PayloadSlot = Arc<Mutex<Option<TaskPayload>>>;

/// Callback producing successive chunks for a child's piped stdin.
///
/// Called repeatedly until it returns `None`, after which the runner
/// closes the pipe. The payload slot is passed in so the callback can
/// keep cursor state of its own choosing.
pub type FeedFn = Arc<dyn Fn(&mut Option<TaskPayload>) -> Option<Vec<u8>> + Send + Sync>;

/// A pipe-fed stdin: the runner allocates the pipe and drives `feed`.
pub struct FeedSource {
    pub feed: FeedFn,
    pub payload: PayloadSlot,
}

/// Where a child's standard input comes from.
pub enum StdinSource {
    /// No input; stdin is attached to the null device.
    Null,
    /// Redirect from an already-opened file. The runner owns the
    /// descriptor and closes it once the child exits.
    File(File),
    /// Allocate a writable pipe and feed it from a callback.
    Pipe(FeedSource),
}

impl std::fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::File(file) => f.debug_tuple("File").field(file).finish(),
            Self::Pipe(_) => f.write_str("Pipe(..)"),
        }
    }
}

/// Specification for one child process.
#[derive(Debug)]
pub struct ChildTask {
    /// Argument vector. `args[0]` is the program, or with `use_shell`
    /// the command line handed to the shell.
    pub args: Vec<OsString>,
    /// Run `args[0]` through the platform shell so one-liners work.
    pub use_shell: bool,
    /// Extra environment variables for the child.
    pub env: Vec<(String, String)>,
    pub stdin: StdinSource,
    /// Send the child's stdout to the parent's stderr stream.
    pub stdout_to_stderr: bool,
    /// Working directory override.
    pub dir: Option<PathBuf>,
    /// Identity reported back through the completion callbacks.
    pub label: String,
}

impl ChildTask {
    /// Create an empty task with the given label; stdin defaults to the
    /// null device.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            args: Vec::new(),
            use_shell: false,
            env: Vec::new(),
            stdin: StdinSource::Null,
            stdout_to_stderr: false,
            dir: None,
            label: label.into(),
        }
    }
}
