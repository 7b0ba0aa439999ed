// Rust guideline compliant 2026-02-06

//! Implementation of the `baseutils mail` command.

use anyhow::{Context, Result};
use baseutils_core::{send_mail, Mail};
use std::io::Read;

/// Sends an HTML mail.
///
/// # Arguments
///
/// * `mail` - Message with everything except the body filled in
/// * `body` - Inline body, if given
/// * `body_file` - Body file (`-` for stdin), used when `body` is absent
/// * `smtp_server` - `host` or `host:port`
///
/// # Errors
///
/// Returns an error if the body cannot be read or delivery fails.
pub fn execute(
    mut mail: Mail,
    body: Option<String>,
    body_file: Option<String>,
    smtp_server: &str,
) -> Result<()> {
    mail.body = match (body, body_file) {
        (Some(body), _) => body,
        (None, Some(path)) if path == "-" => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read body file {}", path))?,
        (None, None) => anyhow::bail!("Provide --body or --body-file"),
    };

    send_mail(&mail, smtp_server)?;
    println!("Sent '{}' to {} recipient(s)", mail.subject, mail.recipients().len());
    Ok(())
}
