// Rust guideline compliant 2026-02-09

//! Logger configuration.
//!
//! Builds a `tracing` subscriber with an optional size-rotating log file and
//! an optional stderr stream. Both sinks share one level threshold and one
//! line format, and the format can be swapped at runtime through
//! [`LoggerHandle::replace_format`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{reload, Layer, Registry};

/// Number of rotated backups kept next to the active log file.
pub const LOG_BACKUP_COUNT: usize = 10;

/// Size in bytes at which the log file is rotated.
pub const LOG_MAX_BYTES: u64 = 10_240_000;

/// Line format for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// `[time] [target] [span] LEVEL message`, with `-` outside any span.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Options for [`configure_logger`].
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Log file path; file logging is disabled when unset.
    pub file_path: Option<PathBuf>,
    /// Whether to also log to stderr.
    pub stream: bool,
    /// Line format used by every sink.
    pub format: LogFormat,
    /// Minimum level that is recorded.
    pub level: Level,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            file_path: None,
            stream: false,
            format: LogFormat::Text,
            level: Level::INFO,
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Clone)]
enum Sink {
    File(NonBlocking),
    Stderr,
}

/// Handle on a configured logger.
///
/// Dropping the handle flushes and stops the background file writer.
pub struct LoggerHandle {
    reload: reload::Handle<Vec<BoxedLayer>, Registry>,
    sinks: Vec<Sink>,
    format: LogFormat,
    _guards: Vec<WorkerGuard>,
}

impl LoggerHandle {
    /// Format currently used by the sinks.
    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Replaces the formatter on every sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscriber owning the sinks has been dropped.
    pub fn replace_format(&mut self, format: LogFormat) -> Result<()> {
        let layers = build_layers(&self.sinks, format);
        self.reload
            .reload(layers)
            .map_err(|e| Error::Logging(e.to_string()))?;
        self.format = format;
        Ok(())
    }
}

/// Builds a subscriber for `options` without installing it.
///
/// # Returns
///
/// The subscriber and the handle controlling its sinks. Install the
/// subscriber with `tracing::subscriber::set_global_default` or scope it with
/// `tracing::subscriber::with_default`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn configure_logger(
    options: &LogOptions,
) -> Result<(impl Subscriber + Send + Sync + 'static, LoggerHandle)> {
    let mut sinks = Vec::new();
    let mut guards = Vec::new();

    if let Some(path) = &options.file_path {
        let file = RotatingFile::open(path, LOG_MAX_BYTES, LOG_BACKUP_COUNT)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        sinks.push(Sink::File(writer));
        guards.push(guard);
    }
    if options.stream {
        sinks.push(Sink::Stderr);
    }

    let (layer, reload) = reload::Layer::new(build_layers(&sinks, options.format));
    let subscriber = Registry::default()
        .with(layer)
        .with(LevelFilter::from_level(options.level));

    let handle = LoggerHandle {
        reload,
        sinks,
        format: options.format,
        _guards: guards,
    };
    Ok((subscriber, handle))
}

/// Builds a logger and installs it as the global default.
///
/// Only the first installation takes effect; later calls still return a
/// handle but their subscriber is discarded.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logger(options: &LogOptions) -> Result<LoggerHandle> {
    let (subscriber, handle) = configure_logger(options)?;
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(handle)
}

/// Parses a level name (`error`, `warn`, `info`, `debug`, `trace`).
///
/// # Errors
///
/// Returns an error for unknown names.
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => Err(Error::InvalidLogLevel(other.to_string())),
    }
}

/// Emits `message` at a level chosen at runtime.
pub(crate) fn log_at(level: Level, message: &str) {
    if level == Level::ERROR {
        tracing::error!("{}", message);
    } else if level == Level::WARN {
        tracing::warn!("{}", message);
    } else if level == Level::INFO {
        tracing::info!("{}", message);
    } else if level == Level::DEBUG {
        tracing::debug!("{}", message);
    } else {
        tracing::trace!("{}", message);
    }
}

fn build_layers(sinks: &[Sink], format: LogFormat) -> Vec<BoxedLayer> {
    sinks
        .iter()
        .map(|sink| -> BoxedLayer {
            match (sink.clone(), format) {
                (Sink::File(writer), LogFormat::Text) => tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .event_format(TextFormat)
                    .boxed(),
                (Sink::File(writer), LogFormat::Json) => tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .boxed(),
                (Sink::Stderr, LogFormat::Text) => tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .event_format(TextFormat)
                    .boxed(),
                (Sink::Stderr, LogFormat::Json) => tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .boxed(),
            }
        })
        .collect()
}

/// Classic one-line text format.
struct TextFormat;

impl<S, N> FormatEvent<S, N> for TextFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "[{}] [{}] ",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            meta.target()
        )?;
        match ctx.lookup_current() {
            Some(span) => write!(writer, "[{}] ", span.name())?,
            None => write!(writer, "[-] ")?,
        }
        write!(writer, "{} ", meta.level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file that rotates to `<path>.1`..`<path>.N` once it grows past a size.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Opens (appending to) `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path, max_bytes: u64, backups: usize) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            backups,
            file,
            written,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backups > 0 {
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    std::fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            std::fs::rename(&self.path, self.backup_path(1))?;
        }
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0 && self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
