// Rust guideline compliant 2026-02-06

//! Baseutils Core Library
//!
//! Low-level helpers shared by operational scripts and tools:
//! - Shell command execution with merged, logged output
//! - Shell quoting
//! - Retry, timeout and inter-process lock primitives
//! - Logger configuration (rotating files, stderr, text or JSON)
//! - SMTP mail delivery and parallel SSH execution
//! - GitHub release discovery
//! - Configuration loading for the commit gate

pub mod config;
pub mod error;
pub mod exec;
pub mod lock;
pub mod logging;
pub mod mail;
pub mod release;
pub mod retry;
pub mod shell;
pub mod ssh;
pub mod timeout;

pub use config::{Config, LintConfig};
pub use error::{Error, Result};
pub use exec::{exe_cmd, find_on_path, Exec, ExecOutput};
pub use lock::{local_lock, try_local_lock, LocalLock};
pub use logging::{configure_logger, init_logger, parse_log_level, LogFormat, LogOptions, LoggerHandle};
pub use mail::{send_mail, Mail};
pub use release::{discover_github_latest_patch_release, latest_patch_release, Release};
pub use retry::{retry, RetryPolicy};
pub use shell::shell_escape;
pub use ssh::{parallel_ssh, SshOptions, SshResult, SshTarget};
pub use timeout::Timeout;
