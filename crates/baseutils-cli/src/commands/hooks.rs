// Rust guideline compliant 2026-02-06

//! Hook command wrappers for invoking baseutils Git hooks from the CLI.

use anyhow::Result;
use baseutils_core::Config;
use baseutils_hooks::{install_hook, pre_commit_hook, work_tree};

/// Command the installed pre-commit script runs.
const PRE_COMMIT_COMMAND: &str = "baseutils hooks pre-commit";

/// Supported hook actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::Subcommand)]
pub enum HookAction {
    /// Run the pre-commit lint gate
    PreCommit,
    /// Install the pre-commit hook into the current repository
    Install {
        /// Overwrite an existing hook
        #[arg(long)]
        force: bool,
    },
}

/// Runs the requested hook action.
///
/// # Arguments
///
/// * `action` - Hook action to run
/// * `config` - Loaded configuration
///
/// # Errors
///
/// Returns an error if the hook fails or cannot be installed.
pub fn execute(action: HookAction, config: &Config) -> Result<()> {
    let root = work_tree(&std::env::current_dir()?);
    match action {
        HookAction::PreCommit => pre_commit_hook(&root, &config.lint)?,
        HookAction::Install { force } => {
            let path = install_hook(&root, "pre-commit", PRE_COMMIT_COMMAND, force)?;
            println!("Installed pre-commit hook at {}", path.display());
        }
    }
    Ok(())
}
