//! Log output for the server process.
//!
//! Console output is always on. The JSON file layer is added only when the
//! log directory can be created, so a read-only host (serverless) still
//! starts and logs to the console.

use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_PREFIX: &str = "prinix.log";

/// Where log lines go after [`init_logger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    ConsoleAndFile(PathBuf),
    ConsoleOnly,
}

/// Daily-rotated appender writing `<log_dir>/prinix.log.YYYY-MM-DD`.
/// Creates the directory; fails instead of panicking when it cannot.
pub fn daily_appender(log_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. If a subscriber is already
/// installed it is kept, and only the returned sink reflects `log_dir`.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> LogSink {
    let log_dir = log_dir.as_ref();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, file_error) = match daily_appender(log_dir) {
        Ok(appender) => (
            Some(fmt::layer().json().with_writer(appender).with_ansi(false)),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match file_error {
        None => LogSink::ConsoleAndFile(log_dir.to_path_buf()),
        Some(e) => {
            warn!(
                dir = %log_dir.display(),
                error = %e,
                "Log directory unavailable; logging to console only"
            );
            LogSink::ConsoleOnly
        }
    }
}
