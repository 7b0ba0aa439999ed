// Rust guideline compliant 2026-02-06

//! Inter-process locks backed by files in the temp directory.

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Lock name used when none is given.
pub const DEFAULT_LOCK_NAME: &str = "baseutils";

/// Exclusive lock held until dropped.
#[derive(Debug)]
pub struct LocalLock {
    file: File,
    path: PathBuf,
}

impl LocalLock {
    /// Path of the underlying lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LocalLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn lock_path(name: Option<&str>) -> PathBuf {
    std::env::temp_dir().join(format!("{}.lock", name.unwrap_or(DEFAULT_LOCK_NAME)))
}

fn open_lock_file(path: &Path) -> Result<File> {
    Ok(OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?)
}

/// Acquires the named lock, blocking until it is free.
///
/// This uses a platform file lock (flock on Unix, LockFileEx on Windows) on
/// `<temp_dir>/<name>.lock`, so it serializes separate processes as well as
/// threads using separate handles.
///
/// # Errors
///
/// Returns an error if the lock file cannot be opened or locked.
pub fn local_lock(name: Option<&str>) -> Result<LocalLock> {
    let path = lock_path(name);
    let file = open_lock_file(&path)?;
    file.lock_exclusive()?;
    tracing::debug!("Acquired lock {}", path.display());
    Ok(LocalLock { file, path })
}

/// Acquires the named lock without blocking.
///
/// # Errors
///
/// Returns an `Io` error of kind `WouldBlock` if another holder owns the lock.
pub fn try_local_lock(name: Option<&str>) -> Result<LocalLock> {
    let path = lock_path(name);
    let file = open_lock_file(&path)?;
    file.try_lock_exclusive().map_err(|e| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::WouldBlock,
            format!("Failed to acquire lock {}: {}", path.display(), e),
        ))
    })?;
    Ok(LocalLock { file, path })
}
