// Rust guideline compliant 2026-02-06

//! Implementation of the `baseutils escape` command.

use anyhow::Result;
use baseutils_core::shell_escape;

/// Prints each value quoted for safe use as a shell word.
pub fn execute(values: Vec<String>) -> Result<()> {
    let escaped: Vec<String> = values.iter().map(|v| shell_escape(v)).collect();
    println!("{}", escaped.join(" "));
    Ok(())
}
