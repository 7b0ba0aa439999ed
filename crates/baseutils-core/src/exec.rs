// Rust guideline compliant 2026-02-06

//! Shell command execution.
//!
//! Commands run through the platform shell with stdout and stderr merged
//! into a single output buffer. Each line is logged as it arrives.

use crate::logging::log_at;
use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::Level;

/// Placeholder shown instead of an obfuscated value.
const MASK: &str = "***";

/// Result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Return code of the command.
    pub rc: i32,
    /// Merged stdout and stderr.
    pub output: String,
}

/// Builder for running a shell command line.
#[derive(Debug, Clone)]
pub struct Exec {
    command: String,
    working_dir: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    env_clear: bool,
    stdin: Option<String>,
    obfuscate: Option<String>,
    log_level: Option<Level>,
    raise_on_failure: bool,
    timeout: Option<Duration>,
}

impl Exec {
    /// Creates a builder for `command`, interpreted by the platform shell.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
            env: Vec::new(),
            env_clear: false,
            stdin: None,
            obfuscate: None,
            log_level: Some(Level::INFO),
            raise_on_failure: true,
            timeout: None,
        }
    }

    /// Runs the command from `dir`.
    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets an environment variable for the command.
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Starts the command from an empty environment instead of inheriting ours.
    pub fn env_clear(mut self) -> Self {
        self.env_clear = true;
        self
    }

    /// Feeds `input` to the command's stdin, then closes it.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Hides `secret` behind `***` in logs and error messages.
    pub fn obfuscate(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.obfuscate = (!secret.is_empty()).then_some(secret);
        self
    }

    /// Level for logging output lines; `None` disables logging.
    pub fn log_level(mut self, level: Option<Level>) -> Self {
        self.log_level = level;
        self
    }

    /// Whether a non-zero return code is an error (default: true).
    pub fn raise_on_failure(mut self, raise: bool) -> Self {
        self.raise_on_failure = raise;
        self
    }

    /// Kills the command once `timeout` has elapsed.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The command line as it appears in logs.
    pub fn display_command(&self) -> String {
        self.mask(&self.command)
    }

    fn mask(&self, text: &str) -> String {
        match &self.obfuscate {
            Some(secret) => text.replace(secret.as_str(), MASK),
            None => text.to_string(),
        }
    }

    /// Runs the command to completion.
    ///
    /// # Returns
    ///
    /// The return code and merged output. With `raise_on_failure(false)` a
    /// non-zero return code is logged and returned rather than raised.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The shell cannot be spawned
    /// - The command exits non-zero and `raise_on_failure` is set
    /// - The timeout elapses
    pub fn run(&self) -> Result<ExecOutput> {
        let shown = self.display_command();
        if self.log_level.is_some() {
            tracing::info!("Executing: {}", shown);
        }

        let mut command = shell_command(&self.command);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        if self.env_clear {
            command.env_clear();
        }
        command.envs(self.env.iter().map(|(k, v)| (k, v)));

        // One pipe for both streams keeps lines in the order they were written.
        let (pipe, writer) = io::pipe()?;
        command
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let spawned = command.spawn();
        // Closes our copies of the write end so the reader sees EOF.
        drop(command);
        let mut child = spawned?;

        if let (Some(input), Some(mut stdin)) = (self.stdin.clone(), child.stdin.take()) {
            // Written from a separate thread so a chatty child cannot deadlock us.
            thread::spawn(move || {
                let _ = stdin.write_all(input.as_bytes());
            });
        }

        let (tx, rx) = mpsc::channel();
        let reader = spawn_reader(pipe, tx);

        let output = match self.collect(&rx, &mut child)? {
            Some(output) => output,
            None => {
                kill_tree(&mut child);
                let _ = child.wait();
                let limit = self.timeout.unwrap_or_default();
                return Err(Error::Timeout(format!(
                    "Command exceeded timeout of {:?}: {}",
                    limit, shown
                )));
            }
        };

        let _ = reader.join();
        let rc = return_code(child.wait()?);

        if rc != 0 {
            if self.raise_on_failure {
                return Err(Error::CommandFailed {
                    command: shown,
                    rc,
                    output: self.log_level.map(|_| self.mask(&output)),
                });
            }
            tracing::error!("Error executing command: {}. RC: {}", shown, rc);
        } else if self.log_level.is_some() {
            tracing::info!("Command successful. Returning output");
        }

        Ok(ExecOutput { rc, output })
    }

    /// Drains output lines until the pipe closes; `None` on timeout.
    fn collect(&self, rx: &Receiver<String>, child: &mut Child) -> Result<Option<String>> {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut output = String::new();

        loop {
            let line = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(remaining) {
                        Ok(line) => line,
                        Err(RecvTimeoutError::Timeout) => return Ok(None),
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match rx.recv() {
                    Ok(line) => line,
                    Err(_) => break,
                },
            };
            self.log_line(&line);
            output.push_str(&line);
        }

        // The pipe is closed but the process may still be running.
        if let Some(deadline) = deadline {
            while child.try_wait()?.is_none() {
                if Instant::now() >= deadline {
                    return Ok(None);
                }
                thread::sleep(Duration::from_millis(10));
            }
        }

        Ok(Some(output))
    }

    fn log_line(&self, line: &str) {
        if let Some(level) = self.log_level {
            if !line.trim().is_empty() {
                log_at(level, &self.mask(line.trim_end()));
            }
        }
    }
}

/// Runs `command` with default settings.
///
/// Shorthand for `Exec::new(command).run()`.
///
/// # Errors
///
/// See [`Exec::run`].
pub fn exe_cmd(command: &str) -> Result<ExecOutput> {
    Exec::new(command).run()
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    use std::os::unix::process::CommandExt;
    let mut command = Command::new("sh");
    // Own process group, so a timeout can kill the whole command tree.
    command.arg("-c").arg(line).process_group(0);
    command
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(line);
    command
}

/// Kills the shell and everything it started.
#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    let group = format!("-{}", child.id());
    let killed = Command::new("kill")
        .args(["-KILL", "--", &group])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if !killed {
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}

fn spawn_reader<R>(pipe: R, tx: Sender<String>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(String::from_utf8_lossy(&buf).into_owned()).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(unix)]
fn return_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn return_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Resolves `program` against a `PATH`-style search list.
///
/// `path_var` defaults to the `PATH` environment variable. A program name
/// containing a path separator is checked as-is. On Windows the `PATHEXT`
/// extensions are tried as well.
///
/// # Returns
///
/// The first executable match, or `None`.
pub fn find_on_path(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let path_var = match path_var {
        Some(value) => value.to_os_string(),
        None => std::env::var_os("PATH")?,
    };

    std::env::split_paths(&path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    std::iter::once(dir.join(program))
        .chain(
            exts.split(';')
                .filter(|ext| !ext.is_empty())
                .map(|ext| dir.join(format!("{}{}", program, ext))),
        )
        .collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
