// Rust guideline compliant 2026-02-06

//! Error types for the commit hooks.

use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures of a hook run.
#[derive(Debug, Error)]
pub enum HookError {
    /// The lint tool could not be resolved on `PATH`.
    #[error("Cannot find {tool}")]
    ToolNotFound {
        /// Name of the missing tool.
        tool: String,
    },

    /// The lint tool ran and reported problems.
    #[error("Errors were found by {tool}")]
    LintFailed {
        /// Name of the tool.
        tool: String,
        /// Exit code, if the tool exited normally.
        code: Option<i32>,
    },

    /// A hook script already exists at the target path.
    #[error("Hook already exists: {0}")]
    HookExists(PathBuf),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
