// Rust guideline compliant 2026-02-06

//! Baseutils CLI library.
//!
//! This library exposes the CLI modules for use in tests and external code.

pub mod commands;
pub mod output;

pub use output::format_ssh_results;
