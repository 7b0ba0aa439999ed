// Rust guideline compliant 2026-02-06

//! Implementation of the `baseutils exec` command.
//!
//! Runs a shell command, optionally under a named lock and with retries.

use anyhow::Result;
use baseutils_core::{local_lock, retry, Exec, RetryPolicy};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Options for a single `exec` invocation.
#[derive(Debug, Clone, Default)]
pub struct ExecArgs {
    /// Shell command line.
    pub command: String,
    /// Working directory.
    pub cwd: Option<PathBuf>,
    /// Value hidden in logs and errors.
    pub obfuscate: Option<String>,
    /// Kill the command after this many seconds.
    pub timeout: Option<u64>,
    /// Total attempts before giving up.
    pub retries: u32,
    /// Seconds between attempts.
    pub retry_interval: u64,
    /// Hold this inter-process lock while running.
    pub lock: Option<String>,
    /// Report a non-zero return code instead of failing.
    pub allow_failure: bool,
    /// Do not log output lines.
    pub quiet: bool,
}

/// Executes the exec command.
///
/// Prints the merged output to stdout.
///
/// # Returns
///
/// The command's return code; non-zero only with `allow_failure`.
///
/// # Errors
///
/// Returns an error if:
/// - The lock cannot be acquired
/// - Every attempt fails
pub fn execute(args: ExecArgs) -> Result<i32> {
    let mut exec = Exec::new(&args.command)
        .log_level((!args.quiet).then_some(Level::DEBUG))
        .raise_on_failure(!args.allow_failure);
    if let Some(cwd) = &args.cwd {
        exec = exec.working_dir(cwd);
    }
    if let Some(secret) = &args.obfuscate {
        exec = exec.obfuscate(secret.clone());
    }
    if let Some(seconds) = args.timeout {
        exec = exec.timeout(Duration::from_secs(seconds));
    }

    let _lock = args.lock.as_deref().map(|name| local_lock(Some(name))).transpose()?;

    let policy = RetryPolicy::new(args.retries, Duration::from_secs(args.retry_interval));
    let result = retry(policy, || exec.run())?;

    print!("{}", result.output);
    Ok(result.rc)
}
