//! Logging setup
//!
//! The host logs to a single file, `$XDG_STATE_HOME/sqldemo/sqldemo.log`,
//! appended to on every run. A run is short-lived, so the file is never
//! rotated. `RUST_LOG` wins over the configured level when set.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the state directory
pub const LOG_FILE_NAME: &str = "sqldemo.log";

/// Install the global file logger under the XDG state directory.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    init_in(&Config::state_dir(), config)
}

/// Install the global file logger writing to `dir/sqldemo.log`.
///
/// Fails with [`Error::Config`] if a global subscriber is already set.
pub fn init_in(dir: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    let (subscriber, guard) = file_subscriber(dir, config)?;
    subscriber
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {e}")))?;

    tracing::info!(
        path = %dir.join(LOG_FILE_NAME).display(),
        level = %config.level,
        "Logging initialized"
    );
    Ok(LoggingGuard { _guard: guard })
}

fn file_subscriber(
    dir: &Path,
    config: &LoggingConfig,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE_NAME));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_thread_names(true),
    );
    Ok((subscriber, guard))
}

/// Route logs to the test harness output. Safe to call from every test.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flushes buffered log lines when dropped; hold it for the life of `main`.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_logs_to_single_unrotated_file() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            level: "info".to_string(),
        };

        let (subscriber, guard) = file_subscriber(dir.path(), &config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(count = 2, "Startup load complete");
            tracing::debug!("filtered out at info");
        });
        drop(guard);

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![LOG_FILE_NAME]);

        let contents = fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert!(contents.contains("Startup load complete"));
        assert!(!contents.contains("filtered out"));
    }

    #[test]
    fn test_log_path_uses_file_name() {
        assert!(Config::log_path().ends_with(LOG_FILE_NAME));
    }
}
