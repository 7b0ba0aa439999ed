// Rust guideline compliant 2026-02-06

//! Baseutils Git Hooks
//!
//! This crate provides the commit-time lint gate:
//! - Pre-commit check (lint tool present, lint tool clean)
//! - Hook script installation

pub mod error;
pub mod install;
pub mod pre_commit;

pub use error::HookError;
pub use install::install_hook;
pub use pre_commit::{lint_args, pre_commit_hook, run_gate, work_tree};
