// Rust guideline compliant 2026-02-06

//! Installing hook scripts into a repository.

use crate::HookError;
use git2::Repository;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `<git dir>/hooks/<hook_name>` as a shell script running `command`.
///
/// The Git directory is discovered from `repo_path`; outside a repository
/// `<repo_path>/.git` is used.
///
/// # Arguments
///
/// * `repo_path` - Path inside the Git repository
/// * `hook_name` - Hook file name, e.g. `pre-commit`
/// * `command` - Command line the hook runs
/// * `force` - Overwrite an existing hook
///
/// # Returns
///
/// The path of the installed script.
///
/// # Errors
///
/// Returns an error if a hook exists and `force` is false, or if the script
/// cannot be written.
pub fn install_hook(
    repo_path: &Path,
    hook_name: &str,
    command: &str,
    force: bool,
) -> Result<PathBuf, HookError> {
    let git_dir = Repository::discover(repo_path)
        .map(|repo| repo.path().to_path_buf())
        .unwrap_or_else(|_| repo_path.join(".git"));
    let hooks_dir = git_dir.join("hooks");
    fs::create_dir_all(&hooks_dir)?;

    let path = hooks_dir.join(hook_name);
    if path.exists() && !force {
        return Err(HookError::HookExists(path));
    }

    fs::write(&path, format!("#!/bin/sh\n{}\n", command))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)?;
    }

    tracing::info!("Installed {} hook at {}", hook_name, path.display());
    Ok(path)
}
