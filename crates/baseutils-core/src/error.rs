// Rust guideline compliant 2026-02-06

//! Error types for the baseutils core library.

use thiserror::Error;

/// Result type alias for baseutils operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for baseutils operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or unreadable configuration.
    #[error("Invalid config: {0}")]
    Config(String),

    /// A command exited with a non-zero return code.
    ///
    /// `output` is only carried when the command was run with logging enabled.
    #[error("Error executing command: {command}. RC: {rc}{}", output_suffix(.output))]
    CommandFailed {
        /// The (obfuscated) command line.
        command: String,
        /// Return code of the command.
        rc: i32,
        /// Captured output, if logging was enabled.
        output: Option<String>,
    },

    /// An operation exceeded its time limit.
    #[error("{0}")]
    Timeout(String),

    /// SMTP conversation failed.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A version string could not be parsed.
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// No release matched the requested version.
    #[error("No release found matching {0}")]
    NoMatchingRelease(String),

    /// Invalid log level name.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// The logger could not be reconfigured.
    #[error("Logging error: {0}")]
    Logging(String),
}

fn output_suffix(output: &Option<String>) -> String {
    match output {
        Some(output) if !output.trim().is_empty() => format!("\n{}", output.trim_end()),
        _ => String::new(),
    }
}
