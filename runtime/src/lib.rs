//! Process bootstrap shared by the content hub binaries.
//!
//! Installs the global `tracing` subscriber: a human-readable stderr layer
//! filtered through `RUST_LOG` and, when a log directory is configured, a
//! daily-rolling file layer written off the calling thread.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// How the global subscriber should be assembled.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Filter directive applied when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
    /// Directory for rolling log files; stderr only when `None`.
    pub log_dir: Option<PathBuf>,
    /// File name prefix for rolling log files.
    pub file_prefix: String,
    /// Colorize stderr output.
    pub ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
            file_prefix: "content-hub.log".to_string(),
            ansi: true,
        }
    }
}

/// Failures while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("failed to create log directory {path}")]
    CreateDir {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A global subscriber was installed earlier in this process.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[source] tracing_subscriber::util::TryInitError),
}

/// Keeps the background log writer alive; drop it last in `main`.
#[must_use = "dropping the guard stops the file writer"]
pub struct LoggingGuard {
    _file_writer: Option<WorkerGuard>,
}

/// Install the global subscriber described by `options`.
pub fn init_logging(options: &LoggingOptions) -> Result<LoggingGuard, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(options.ansi);

    let (file_layer, file_writer) = match options.log_dir.as_deref() {
        Some(dir) => {
            prepare_log_dir(dir)?;
            let appender = tracing_appender::rolling::daily(dir, &options.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(LoggingError::AlreadyInstalled)?;

    if let Some(dir) = options.log_dir.as_deref() {
        tracing::debug!(log_dir = %dir.display(), "file logging enabled");
    }

    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}

fn prepare_log_dir(dir: &Path) -> Result<(), LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
