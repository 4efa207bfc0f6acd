//! Logging configuration for EntryLite
//!
//! Leveled diagnostics using the `tracing` framework, written to stdout,
//! to a rotating file, or to a fresh timestamped file per run in a log
//! directory.

use chrono::{DateTime, Local};
use entrylite_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::dispatcher::{self, Dispatch};
use tracing::subscriber::NoSubscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a file with daily rotation
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
    /// New `database_<timestamp>.log` file in the directory, created if missing
    Directory(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format (default)
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Create config with info level and stdout output
    pub fn info() -> Self {
        Self::default()
    }

    /// Create config with debug level
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            ..Default::default()
        }
    }

    /// Create config with warn level
    pub fn warn() -> Self {
        Self {
            level: "warn".to_string(),
            ..Default::default()
        }
    }

    /// Set log output to file with rotation
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log output to a timestamped file inside `dir`
    pub fn with_directory<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output = LogOutput::Directory(dir.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Initialize global logging with this configuration
    ///
    /// `RUST_LOG` takes precedence over the configured level. Returns a
    /// guard that must be kept alive while logging to a file; dropping it
    /// flushes and stops the writer thread.
    ///
    /// Fails if the level is invalid, the log directory cannot be created,
    /// or a global subscriber is already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use entrylite::logging::LogConfig;
    ///
    /// let _guard = LogConfig::info().with_directory("logs").init()?;
    /// # Ok::<(), entrylite::Error>(())
    /// ```
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let (dispatch, guard) = self.build()?;
        dispatch.try_init().map_err(already_set)?;
        Ok(guard)
    }

    /// Builds the subscriber without installing it.
    ///
    /// Use with [`tracing::dispatcher::with_default`] to log to this
    /// configuration for a scope only.
    pub fn build(self) -> Result<(Dispatch, Option<WorkerGuard>)> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| Error::Config(format!("invalid log level {:?}: {}", self.level, e)))?;

        match self.output {
            LogOutput::Stdout => {
                let dispatch = match self.format {
                    LogFormat::Pretty => Dispatch::new(
                        tracing_subscriber::registry()
                            .with(env_filter)
                            .with(fmt::layer().pretty()),
                    ),
                    LogFormat::Compact => Dispatch::new(
                        tracing_subscriber::registry()
                            .with(env_filter)
                            .with(fmt::layer().compact()),
                    ),
                };
                Ok((dispatch, None))
            }
            LogOutput::File(path) => {
                let (writer, guard) = rolling_writer(&path);
                Ok((file_dispatch(env_filter, self.format, writer), Some(guard)))
            }
            LogOutput::Both(path) => {
                let (writer, guard) = rolling_writer(&path);
                let dispatch = Dispatch::new(
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer())
                        .with(fmt::layer().with_writer(writer).with_ansi(false)),
                );
                Ok((dispatch, Some(guard)))
            }
            LogOutput::Directory(dir) => {
                fs::create_dir_all(&dir)?;
                let file_name = log_file_name(Local::now());
                let appender = tracing_appender::rolling::never(&dir, &file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let dispatch = file_dispatch(env_filter, self.format, writer);
                dispatcher::with_default(&dispatch, || {
                    tracing::info!(file = %dir.join(&file_name).display(), "New log file created");
                });
                Ok((dispatch, Some(guard)))
            }
        }
    }
}

/// Whether events on this thread already go to a subscriber, global or scoped.
pub fn subscriber_installed() -> bool {
    dispatcher::get_default(|current| !current.is::<NoSubscriber>())
}

/// Name of the per-run log file: `database_YYYY-MM-DD_HH-MM-SS.log`.
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("database_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}

fn rolling_writer(path: &Path) -> (NonBlocking, WorkerGuard) {
    let file_appender = tracing_appender::rolling::daily(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("entrylite.log"),
    );
    tracing_appender::non_blocking(file_appender)
}

fn file_dispatch(env_filter: EnvFilter, format: LogFormat, writer: NonBlocking) -> Dispatch {
    match format {
        LogFormat::Pretty => Dispatch::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false).pretty()),
        ),
        LogFormat::Compact => Dispatch::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false).compact()),
        ),
    }
}

fn already_set(err: tracing_subscriber::util::TryInitError) -> Error {
    Error::Config(format!("cannot install log subscriber: {}", err))
}
