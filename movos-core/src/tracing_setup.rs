//! Tracing setup for Movos
//!
//! Two sinks: the terminal gets what the user asked for, and a run log in the
//! data directory gets everything. The run log is truncated on each start.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::MovosError;

/// Name of the per-run debug log.
pub const LOG_FILE_NAME: &str = "movos-last-run.log";

const DEFAULT_LOGS_DIR: &str = "logs";

/// Installs the terminal and run-log layers and returns the run log path.
///
/// `RUST_LOG`, when set, replaces `console_level` for the terminal only.
///
/// # Errors
///
/// - `MovosError::Io` - If the logs directory or the run log cannot be created
/// - `MovosError::Configuration` - If a global subscriber is already installed
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> Result<PathBuf, MovosError> {
    let dir = logs_dir.map_or_else(|| PathBuf::from(DEFAULT_LOGS_DIR), Path::to_path_buf);
    create_dir_all(&dir)?;
    let run_log_path = dir.join(LOG_FILE_NAME);
    let run_log = File::create(&run_log_path)?;

    tracing_subscriber::registry()
        .with(terminal_layer(console_level))
        .with(run_log_layer(run_log))
        .try_init()
        .map_err(|e| MovosError::Configuration {
            reason: format!("tracing already initialized: {e}"),
        })?;

    tracing::debug!(
        level = %console_level,
        run_log = %run_log_path.display(),
        "Logging configured"
    );
    Ok(run_log_path)
}

fn terminal_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Compact lines on stderr so command output on stdout stays clean.
fn terminal_layer<S>(level: Level) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(terminal_filter(level))
}

fn run_log_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_ansi(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Arc::new(file))
        .with_filter(LevelFilter::TRACE)
}

/// Verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliLogLevel {
    pub fn as_tracing_level(self) -> Level {
        Level::from(self)
    }
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_tracing_level().as_str().to_lowercase())
    }
}
