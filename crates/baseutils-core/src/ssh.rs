// Rust guideline compliant 2026-02-06

//! Running one command on many hosts in parallel.
//!
//! Sessions are driven through the system `ssh` client so host
//! configuration, agents and proxies keep working as they do interactively.

use crate::exec::{find_on_path, Exec};
use crate::shell::shell_escape;
use crate::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::Level;

/// Output reported for a host whose session could not be started.
pub const CONNECTION_FAILURE_OUTPUT: &str =
    "Exception was received while attempting to create an ssh connection to the server";

/// A host to run a command on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshTarget {
    /// Host name or IP address.
    pub ip: String,
    /// Remote user.
    pub username: String,
    /// Private key contents (not a path).
    #[serde(alias = "sshKey")]
    pub ssh_key: String,
}

/// Outcome of the command on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshResult {
    /// Merged remote output.
    pub output: String,
    /// Remote exit status, or -1 when no session was started.
    pub rc: i32,
}

impl SshResult {
    fn connection_failure() -> Self {
        Self {
            output: CONNECTION_FAILURE_OUTPUT.to_string(),
            rc: -1,
        }
    }
}

/// Options for the `ssh` client invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshOptions {
    /// Client program, looked up on `PATH`.
    pub program: String,
    /// Connection timeout in seconds.
    pub connect_timeout: u32,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            connect_timeout: 30,
        }
    }
}

/// Runs `cmd` on every target in parallel.
///
/// Host keys are accepted automatically and the session runs in batch mode,
/// so a prompt never blocks the run.
///
/// # Returns
///
/// One result per target, in input order. Targets whose session could not
/// be started get `rc == -1` and [`CONNECTION_FAILURE_OUTPUT`].
pub fn parallel_ssh(targets: &[SshTarget], cmd: &str, options: &SshOptions) -> Vec<SshResult> {
    let Some(program) = find_on_path(&options.program, None) else {
        tracing::error!("Cannot find ssh client '{}'", options.program);
        return targets.iter().map(|_| SshResult::connection_failure()).collect();
    };
    let program = program.to_string_lossy().into_owned();

    targets
        .par_iter()
        .map(|target| match run_on(target, cmd, &program, options) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(
                    "Failed to create ssh connection to ip {} with username {}: {}",
                    target.ip,
                    target.username,
                    err
                );
                SshResult::connection_failure()
            }
        })
        .collect()
}

fn run_on(target: &SshTarget, cmd: &str, program: &str, options: &SshOptions) -> Result<SshResult> {
    let mut key_file = tempfile::NamedTempFile::new()?;
    key_file.write_all(target.ssh_key.as_bytes())?;
    if !target.ssh_key.ends_with('\n') {
        key_file.write_all(b"\n")?;
    }
    key_file.flush()?;

    let line = format!(
        "{} -i {} -o BatchMode=yes -o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null -o ConnectTimeout={} {} {}",
        shell_escape(program),
        shell_escape(&key_file.path().to_string_lossy()),
        options.connect_timeout,
        shell_escape(&format!("{}@{}", target.username, target.ip)),
        shell_escape(cmd),
    );

    let output = Exec::new(line)
        .log_level(Some(Level::DEBUG))
        .raise_on_failure(false)
        .run()?;

    Ok(SshResult {
        output: output.output,
        rc: output.rc,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn target(ip: &str) -> SshTarget {
        SshTarget {
            ip: ip.to_string(),
            username: "centos".to_string(),
            ssh_key: "-----BEGIN KEY-----\nabc\n-----END KEY-----".to_string(),
        }
    }

    /// Stand-in client: echoes the remote command, fails for host "down".
    fn fake_client(dir: &TempDir) -> String {
        let path = dir.path().join("fake-ssh");
        let script = r#"#!/bin/sh
for arg; do
  case "$arg" in
    *@down) echo "ssh: connect to host down port 22: Connection refused" >&2; exit 255 ;;
  esac
  last="$arg"
done
echo "ran: $last"
"#;
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_results_follow_input_order() {
        let dir = TempDir::new().unwrap();
        let options = SshOptions {
            program: fake_client(&dir),
            ..SshOptions::default()
        };
        let targets = vec![target("10.0.0.1"), target("down"), target("10.0.0.3")];

        let results = parallel_ssh(&targets, "uptime && echo 'x y'", &options);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], SshResult { output: "ran: uptime && echo 'x y'\n".to_string(), rc: 0 });
        assert_eq!(results[1].rc, 255);
        assert!(results[1].output.contains("Connection refused"));
        assert_eq!(results[2].rc, 0);
    }

    #[test]
    fn test_missing_client_reports_connection_failure() {
        let options = SshOptions {
            program: "definitely-not-an-ssh-client".to_string(),
            ..SshOptions::default()
        };
        let results = parallel_ssh(&[target("10.0.0.1"), target("10.0.0.2")], "true", &options);
        assert_eq!(results, vec![SshResult::connection_failure(); 2]);
        assert_eq!(results[0].output, CONNECTION_FAILURE_OUTPUT);
    }

    #[test]
    fn test_target_accepts_camel_case_key() {
        let json = r#"{"ip": "127.0.0.1", "username": "centos", "sshKey": "key value"}"#;
        let parsed: SshTarget = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.ssh_key, "key value");
    }
}
