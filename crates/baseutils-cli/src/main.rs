// Rust guideline compliant 2026-02-06

//! Baseutils CLI Application
//!
//! Command-line front end for the baseutils helpers and commit hooks.

use baseutils_cli::commands::{self, exec::ExecArgs, hooks::HookAction};
use baseutils_core::{init_logger, parse_log_level, Config, LogFormat, LogOptions, Mail};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "baseutils",
    version,
    about = "Baseutils: common helpers for operational scripts",
    after_help = "Examples:\n  baseutils exec 'make deploy' --obfuscate \"$TOKEN\" --retries 3\n  baseutils escape \"it's\"\n  baseutils release 1.16 --repo kubernetes/kubernetes\n  baseutils ssh --targets hosts.json 'uptime'\n  baseutils hooks install\n"
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write logs to this file (rotated by size)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Custom config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Run a shell command with merged, logged output
    Exec {
        /// Command line, interpreted by the platform shell
        command: String,

        /// Working directory
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Value to hide in logs and errors
        #[arg(long)]
        obfuscate: Option<String>,

        /// Kill the command after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Total attempts before giving up
        #[arg(long, default_value_t = 1)]
        retries: u32,

        /// Seconds between attempts
        #[arg(long, default_value_t = 5)]
        retry_interval: u64,

        /// Hold this named inter-process lock while running
        #[arg(long)]
        lock: Option<String>,

        /// Exit with the command's return code instead of failing
        #[arg(long)]
        allow_failure: bool,

        /// Do not log output lines
        #[arg(long)]
        quiet: bool,
    },

    /// Quote values for safe use in a shell command line
    Escape {
        /// Values to quote
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Find the newest patch release of a GitHub project
    Release {
        /// MAJOR.MINOR or MAJOR.MINOR.PATCH
        version: String,

        /// GitHub repository as owner/name
        #[arg(long)]
        repo: Option<String>,

        /// Explicit releases API URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Run a command on many hosts in parallel
    Ssh {
        /// JSON file with [{"ip", "username", "sshKey"}, ...]
        #[arg(long)]
        targets: PathBuf,

        /// Remote command
        command: String,

        /// ssh client program
        #[arg(long)]
        program: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send an HTML mail over SMTP
    Mail {
        /// Sender address
        #[arg(long)]
        from: String,

        /// Recipients
        #[arg(long, value_delimiter = ',', required = true)]
        to: Vec<String>,

        /// Carbon-copy recipients
        #[arg(long, value_delimiter = ',')]
        cc: Vec<String>,

        /// Blind-copy recipients
        #[arg(long, value_delimiter = ',')]
        bcc: Vec<String>,

        /// Subject line
        #[arg(long)]
        subject: String,

        /// HTML body
        #[arg(long)]
        body: Option<String>,

        /// HTML body from file ('-' for stdin)
        #[arg(long)]
        body_file: Option<String>,

        /// SMTP server as host or host:port
        #[arg(long, default_value = baseutils_core::mail::DEFAULT_SMTP_SERVER)]
        smtp_server: String,
    },

    /// Git hook operations
    Hooks {
        #[command(subcommand)]
        action: HookAction,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_file(path)?,
        None => Config::load(&baseutils_hooks::work_tree(&std::env::current_dir()?))?,
    };

    let level = parse_log_level(cli.log_level.as_deref().unwrap_or(&config.log_level))?;
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        config.log_format
    };
    let logger = init_logger(&LogOptions {
        file_path: cli.log_file.clone(),
        stream: true,
        format,
        level,
    })?;

    match cli.command {
        Commands::Exec {
            command,
            cwd,
            obfuscate,
            timeout,
            retries,
            retry_interval,
            lock,
            allow_failure,
            quiet,
        } => {
            let rc = commands::exec::execute(ExecArgs {
                command,
                cwd,
                obfuscate,
                timeout,
                retries,
                retry_interval,
                lock,
                allow_failure,
                quiet,
            })?;
            if rc != 0 {
                drop(logger);
                std::process::exit(rc);
            }
        }
        Commands::Escape { values } => {
            commands::escape::execute(values)?;
        }
        Commands::Release { version, repo, url } => {
            commands::release::execute(&version, repo, url)?;
        }
        Commands::Ssh {
            targets,
            command,
            program,
            json,
        } => {
            commands::ssh::execute(&targets, &command, program, json)?;
        }
        Commands::Mail {
            from,
            to,
            cc,
            bcc,
            subject,
            body,
            body_file,
            smtp_server,
        } => {
            let mail = Mail::new(from, to, subject, String::new())
                .with_cc(cc)
                .with_bcc(bcc);
            commands::mail::execute(mail, body, body_file, &smtp_server)?;
        }
        Commands::Hooks { action } => {
            commands::hooks::execute(action, &config)?;
        }
    }

    drop(logger);
    Ok(())
}
