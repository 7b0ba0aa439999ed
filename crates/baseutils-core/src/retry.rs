// Rust guideline compliant 2026-02-06

//! Retrying fallible operations.

use std::fmt::Display;
use std::time::Duration;

/// How often and how far apart an operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            interval: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with `attempts` tries spaced by `interval`.
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }
}

/// Calls `op` until it succeeds or the policy's attempts are used up.
///
/// A policy with zero attempts still calls `op` once.
///
/// # Returns
///
/// The first successful value.
///
/// # Errors
///
/// Returns the error produced by the final attempt.
pub fn retry<T, E, F>(policy: RetryPolicy, mut op: F) -> std::result::Result<T, E>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: Display,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= attempts => return Err(err),
            Err(err) => {
                tracing::warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}",
                    attempt,
                    attempts,
                    err,
                    policy.interval
                );
                std::thread::sleep(policy.interval);
                attempt += 1;
            }
        }
    }
}
