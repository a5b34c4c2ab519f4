// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency policy for a hook run.

use crate::config::{ConfigError, ConfigSet};
use crate::run::RunHooksOpt;

/// Determine how many hooks may run concurrently.
///
/// Precedence:
/// 1. `stdout_to_stderr == false` forces serial execution: hooks that
///    keep their output streams separate cannot be interleaved.
/// 2. An explicit nonzero `options.jobs`.
/// 3. A nonzero `hook.jobs` configuration value.
/// 4. The number of available processing units.
///
/// The result is always >= 1.
pub(crate) fn hook_jobs(config: &ConfigSet, options: &RunHooksOpt) -> Result<u32, ConfigError> {
    if !options.stdout_to_stderr {
        return Ok(1);
    }
    if options.jobs != 0 {
        return Ok(options.jobs);
    }
    if let Some(jobs) = config.uint("hook.jobs")? {
        if jobs != 0 {
            return Ok(u32::try_from(jobs).unwrap_or(u32::MAX));
        }
    }
    Ok(online_cpus())
}

fn online_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
