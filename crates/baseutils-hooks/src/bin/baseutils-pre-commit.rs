// Rust guideline compliant 2026-02-06

//! CLI entry point for the baseutils pre-commit hook.

use baseutils_core::{init_logger, parse_log_level, Config, LogOptions};

fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let root = baseutils_hooks::work_tree(&cwd);
    let config = Config::load(&root)?;

    let _logger = init_logger(&LogOptions {
        stream: true,
        format: config.log_format,
        level: parse_log_level(&config.log_level)?,
        ..LogOptions::default()
    })?;

    baseutils_hooks::pre_commit_hook(&root, &config.lint)?;
    Ok(())
}
