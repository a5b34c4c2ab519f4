// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The bounded-concurrency task runner.

use std::ffi::OsString;
use std::io::Write;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::task::JoinSet;

use crate::task::{ChildTask, StdinSource};

/// Options for one [`run_tasks`] invocation.
pub struct RunTasksOpts {
    /// Maximum number of concurrently running children. Clamped to >= 1.
    pub processes: u32,
    /// Stream child output directly instead of buffering it per child.
    /// Only safe when the caller rules out interleaving (serial runs).
    pub ungroup: bool,
}

/// Source of tasks plus completion callbacks for one run.
///
/// `next_task` is only ever called from the runner's single control
/// flow, so implementations may keep a plain cursor without locking.
pub trait TaskStream {
    type Error;

    /// Produce the next task, or `Ok(None)` once the stream is
    /// exhausted. An `Err` aborts dispatch of any further tasks.
    fn next_task(&mut self) -> Result<Option<ChildTask>, Self::Error>;

    /// A child could not be spawned.
    fn start_failure(&mut self, label: &str);

    /// A child exited with `code` (128+signal for signal death).
    fn task_finished(&mut self, label: &str, code: i32);
}

/// Run every task the stream produces, keeping up to `opts.processes`
/// children alive at once.
///
/// Dispatch follows stream order; completion order is unspecified when
/// more than one child runs. A stream error stops dispatch immediately,
/// but children that are already running are reaped, not killed, before
/// the error is returned.
pub async fn run_tasks<S: TaskStream>(
    opts: &RunTasksOpts,
    stream: &mut S,
) -> Result<(), S::Error> {
    let processes = opts.processes.max(1) as usize;
    let mut running: JoinSet<FinishedTask> = JoinSet::new();
    let mut pending_err: Option<S::Error> = None;
    let mut exhausted = false;

    loop {
        while !exhausted && pending_err.is_none() && running.len() < processes {
            match stream.next_task() {
                Ok(Some(task)) => dispatch(&mut running, task, opts.ungroup, stream),
                Ok(None) => exhausted = true,
                Err(err) => pending_err = Some(err),
            }
        }

        match running.join_next().await {
            Some(Ok(done)) => {
                done.flush_output();
                stream.task_finished(&done.label, done.code);
            }
            // A waiter task can only stop abnormally if the runtime is
            // shutting down; there is no result left to report.
            Some(Err(_)) => {}
            None => break,
        }
    }

    match pending_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Outcome of one child, carried back to the control flow.
struct FinishedTask {
    label: String,
    code: i32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    stdout_to_stderr: bool,
}

impl FinishedTask {
    /// Emit buffered output, stderr first, with stdout rerouted to the
    /// parent's stderr stream when the task asked for it.
    fn flush_output(&self) {
        if !self.stderr.is_empty() {
            let _ = std::io::stderr().write_all(&self.stderr);
        }
        if self.stdout.is_empty() {
            return;
        }
        if self.stdout_to_stderr {
            let _ = std::io::stderr().write_all(&self.stdout);
        } else {
            let _ = std::io::stdout().write_all(&self.stdout);
        }
    }
}

fn dispatch<S: TaskStream>(
    running: &mut JoinSet<FinishedTask>,
    task: ChildTask,
    ungroup: bool,
    stream: &mut S,
) {
    let ChildTask {
        args,
        use_shell,
        env,
        stdin,
        stdout_to_stderr,
        dir,
        label,
    } = task;
    assert!(!args.is_empty(), "child task must have at least one argument");

    let mut cmd = command_for(&args, use_shell);
    cmd.envs(env);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let mut feed = None;
    cmd.stdin(match stdin {
        StdinSource::Null => Stdio::null(),
        StdinSource::File(file) => Stdio::from(file),
        StdinSource::Pipe(source) => {
            feed = Some(source);
            Stdio::piped()
        }
    });

    // Grouped runs buffer both streams and emit them on completion so
    // concurrent children never interleave. Ungrouped runs inherit,
    // except that a redirected stdout still needs a pipe to reach the
    // parent's stderr.
    if ungroup {
        cmd.stdout(if stdout_to_stderr {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
        cmd.stderr(Stdio::inherit());
    } else {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(_) => {
            stream.start_failure(&label);
            return;
        }
    };

    let stdin_pipe = child.stdin.take();
    running.spawn(async move {
        let feeder = async move {
            if let Some(mut pipe) = stdin_pipe {
                if let Some(source) = feed {
                    loop {
                        // Compute the chunk with the lock held, but never
                        // hold it across the write.
                        let chunk = {
                            let mut payload = source.payload.lock();
                            (source.feed)(&mut payload)
                        };
                        match chunk {
                            Some(bytes) => {
                                if pipe.write_all(&bytes).await.is_err() {
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                }
                // Dropping the handle closes the descriptor exactly once.
                drop(pipe);
            }
        };

        if ungroup {
            wait_ungrouped(child, feeder, label, stdout_to_stderr).await
        } else {
            wait_grouped(child, feeder, label, stdout_to_stderr).await
        }
    });
}

async fn wait_grouped(
    child: Child,
    feeder: impl std::future::Future<Output = ()>,
    label: String,
    stdout_to_stderr: bool,
) -> FinishedTask {
    let (output, ()) = tokio::join!(child.wait_with_output(), feeder);
    match output {
        Ok(output) => FinishedTask {
            label,
            code: exit_code(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
            stdout_to_stderr,
        },
        Err(_) => FinishedTask {
            label,
            code: 1,
            stdout: Vec::new(),
            stderr: Vec::new(),
            stdout_to_stderr,
        },
    }
}

async fn wait_ungrouped(
    mut child: Child,
    feeder: impl std::future::Future<Output = ()>,
    label: String,
    stdout_to_stderr: bool,
) -> FinishedTask {
    let stdout_pipe = child.stdout.take();
    let relay = async move {
        if let Some(mut out) = stdout_pipe {
            let _ = tokio::io::copy(&mut out, &mut tokio::io::stderr()).await;
        }
    };
    let (status, (), ()) = tokio::join!(child.wait(), feeder, relay);
    FinishedTask {
        label,
        code: status.map(exit_code).unwrap_or(1),
        stdout: Vec::new(),
        stderr: Vec::new(),
        stdout_to_stderr,
    }
}

fn command_for(args: &[OsString], use_shell: bool) -> Command {
    if use_shell {
        return shell_command(args);
    }
    let mut cmd = Command::new(&args[0]);
    cmd.args(&args[1..]);
    cmd
}

/// Build a shell invocation of `args[0]`, forwarding any remaining
/// arguments as the shell's positional parameters.
#[cfg(not(windows))]
fn shell_command(args: &[OsString]) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c");
    if args.len() > 1 {
        let mut line = args[0].to_string_lossy().into_owned();
        line.push_str(" \"$@\"");
        cmd.arg(line).arg(&args[0]).args(&args[1..]);
    } else {
        cmd.arg(&args[0]);
    }
    cmd
}

#[cfg(windows)]
fn shell_command(args: &[OsString]) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").args(args);
    cmd
}

fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
