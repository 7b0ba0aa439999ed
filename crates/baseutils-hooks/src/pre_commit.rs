// Rust guideline compliant 2026-02-06

//! Pre-commit hook implementation.
//!
//! Fails the commit when the lint tool is missing or reports problems.

use crate::HookError;
use baseutils_core::{find_on_path, LintConfig};
use git2::Repository;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Builds the fixed option list passed to the lint tool.
pub fn lint_args(config: &LintConfig) -> Vec<String> {
    let mut args = vec![
        format!("--max-complexity={}", config.max_complexity),
        format!("--max-line-length={}", config.max_line_length),
    ];
    if config.statistics {
        args.push("--statistics".to_string());
    }
    if !config.exclude.is_empty() {
        args.push(format!("--exclude={}", config.exclude.join(",")));
    }
    args
}

/// Returns the working tree containing `path`, or `path` itself outside a repository.
pub fn work_tree(path: &Path) -> PathBuf {
    Repository::discover(path)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}

/// Runs the pre-commit hook using the process `PATH`.
///
/// # Arguments
///
/// * `repo_path` - Path inside the Git repository
/// * `config` - Lint tool settings
///
/// # Errors
///
/// Returns an error if:
/// - The lint tool cannot be found
/// - The lint tool reports problems
/// - The lint tool cannot be started
pub fn pre_commit_hook(repo_path: &Path, config: &LintConfig) -> Result<(), HookError> {
    run_gate(repo_path, config, None)
}

/// Runs the gate, resolving the tool against `path_var` instead of `PATH` when given.
///
/// The tool's own output goes straight to our stdout and stderr.
///
/// # Errors
///
/// See [`pre_commit_hook`].
pub fn run_gate(
    repo_path: &Path,
    config: &LintConfig,
    path_var: Option<&OsStr>,
) -> Result<(), HookError> {
    let tool = find_on_path(&config.tool, path_var).ok_or_else(|| HookError::ToolNotFound {
        tool: config.tool.clone(),
    })?;

    let root = work_tree(repo_path);
    let args = lint_args(config);
    tracing::debug!("Running {} {} in {}", tool.display(), args.join(" "), root.display());

    let status = Command::new(&tool)
        .args(&args)
        .arg(".")
        .current_dir(&root)
        .status()?;

    if !status.success() {
        return Err(HookError::LintFailed {
            tool: config.tool.clone(),
            code: status.code(),
        });
    }
    Ok(())
}
