//! Structured logging setup using the `tracing` ecosystem.
//!
//! Everything goes to stderr in compact form. A copy goes to a daily
//! rotated `quizmates.log`, as plain text or JSON per `[logging]
//! json_output`. `RUST_LOG`, when set, overrides the configured level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::LOG_FILE_NAME;
use crate::error::{QmError, QmResult};

/// Keeps the background log writer alive. Dropping it flushes the file.
pub struct LogGuard {
    _guard: WorkerGuard,
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber: stderr plus a rotated file in `log_dir`.
///
/// Fails with `Config` if a global subscriber is already installed.
pub fn init_logging(level: &str, log_dir: &Path, json_output: bool) -> QmResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_NAME));

    let json_file = json_output.then(|| {
        fmt::layer()
            .json()
            .with_writer(writer.clone())
            .with_file(true)
            .with_line_number(true)
    });
    let text_file = (!json_output).then(|| {
        fmt::layer()
            .with_writer(writer.clone())
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(level_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(json_file)
        .with(text_file)
        .try_init()
        .map_err(|e| QmError::Config(format!("logging already initialized: {e}")))?;

    tracing::info!(
        "logging to {} (level={level}, json={json_output})",
        log_dir.join(LOG_FILE_NAME).display()
    );
    Ok(LogGuard { _guard: guard })
}

/// Install logging as described by the `[logging]` section.
pub fn init_from_config(config: &LoggingConfig) -> QmResult<LogGuard> {
    init_logging(&config.level, &config.effective_dir()?, config.json_output)
}

/// Stderr-only logging for tests. Later calls are ignored.
pub fn init_console_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(level_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logging_is_idempotent() {
        init_console_logging("debug");
        init_console_logging("not-a-level");
    }

    #[test]
    fn test_second_file_logger_is_rejected() {
        init_console_logging("info");
        let dir = tempfile::TempDir::new().unwrap();
        let result = init_logging("info", dir.path(), false);
        assert!(matches!(result, Err(QmError::Config(_))));
    }
}
