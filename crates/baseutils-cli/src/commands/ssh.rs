// Rust guideline compliant 2026-02-09

//! Implementation of the `baseutils ssh` command.

use crate::output::format_ssh_results;
use anyhow::{Context, Result};
use baseutils_core::{parallel_ssh, SshOptions, SshTarget};
use std::path::Path;

/// Reads targets from a JSON array of `{ip, username, sshKey}` objects.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_targets(path: &Path) -> Result<Vec<SshTarget>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read targets file {}", path.display()))?;
    let targets = serde_json::from_str(&content)
        .with_context(|| format!("Invalid targets file {}", path.display()))?;
    Ok(targets)
}

/// Runs `command` on every target and prints the results.
///
/// # Errors
///
/// Returns an error if the targets cannot be loaded or any host fails.
pub fn execute(targets_file: &Path, command: &str, program: Option<String>, json: bool) -> Result<()> {
    let targets = load_targets(targets_file)?;
    let mut options = SshOptions::default();
    if let Some(program) = program {
        options.program = program;
    }

    let results = parallel_ssh(&targets, command, &options);
    println!("{}", format_ssh_results(&targets, &results, json));

    let failed = results.iter().filter(|r| r.rc != 0).count();
    if failed > 0 {
        anyhow::bail!("Command failed on {} of {} host(s)", failed, targets.len());
    }
    Ok(())
}
