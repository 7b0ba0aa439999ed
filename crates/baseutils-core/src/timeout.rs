// Rust guideline compliant 2026-02-06

//! Running work under a time limit.

use crate::{Error, Result};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Default message; `SECONDS` is replaced with the configured period.
pub const DEFAULT_TIMEOUT_MESSAGE: &str =
    "A timeout exception has occurred due to exceeding timeout period of SECONDS seconds";

/// A time limit with the error message reported when it is exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeout {
    seconds: u64,
    message: String,
}

impl Default for Timeout {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Timeout {
    /// Creates a limit of `seconds` with the default message.
    pub fn new(seconds: u64) -> Self {
        Self::with_message(seconds, DEFAULT_TIMEOUT_MESSAGE)
    }

    /// Creates a limit with a custom message template.
    pub fn with_message(seconds: u64, template: &str) -> Self {
        Self {
            seconds,
            message: template.replace("SECONDS", &seconds.to_string()),
        }
    }

    /// Length of the period.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }

    /// The formatted message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error reported when the period is exceeded.
    pub fn error(&self) -> Error {
        Error::Timeout(self.message.clone())
    }

    /// Runs `f` on a worker thread and waits at most the configured period.
    ///
    /// The worker is detached on timeout; it keeps running until `f` returns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Timeout` if `f` does not finish in time, or if it panics.
    pub fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.run_for(self.duration(), f)
    }

    fn run_for<T, F>(&self, limit: Duration, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(f());
        });
        match rx.recv_timeout(limit) {
            Ok(value) => Ok(value),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("{}", self.message);
                Err(self.error())
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(Error::Timeout("worker thread exited without a result".to_string()))
            }
        }
    }
}
