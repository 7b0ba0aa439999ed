// Rust guideline compliant 2026-02-06

//! Command implementations for the baseutils CLI.

pub mod escape;
pub mod exec;
pub mod hooks;
pub mod mail;
pub mod release;
pub mod ssh;
