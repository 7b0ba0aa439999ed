// Rust guideline compliant 2026-02-06

//! Output formatting for command results.

use baseutils_core::{SshResult, SshTarget};
use serde_json::json;
use tabled::{builder::Builder, settings::Style};

/// Formats per-host ssh results as a table or as JSON.
///
/// # Arguments
///
/// * `targets` - Hosts in the order the command ran on them
/// * `results` - One result per target, same order
/// * `as_json` - Emit JSON instead of a table
pub fn format_ssh_results(targets: &[SshTarget], results: &[SshResult], as_json: bool) -> String {
    if as_json {
        let rows: Vec<_> = targets
            .iter()
            .zip(results)
            .map(|(target, result)| {
                json!({
                    "ip": target.ip,
                    "username": target.username,
                    "rc": result.rc,
                    "output": result.output,
                })
            })
            .collect();
        let output = json!({ "results": rows, "total": rows.len() });
        return serde_json::to_string_pretty(&output)
            .unwrap_or_else(|_| json!({ "error": "Failed to serialize results" }).to_string());
    }

    let mut builder = Builder::default();
    builder.push_record(vec!["Host", "User", "RC", "Output"]);
    for (target, result) in targets.iter().zip(results) {
        builder.push_record(vec![
            target.ip.clone(),
            target.username.clone(),
            result.rc.to_string(),
            result.output.trim_end().to_string(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}
