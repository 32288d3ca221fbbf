//! Structured JSONL logging plus human-readable stderr output.
//!
//! - **JSONL to file** (`~/.flash-expand/logs/flash-expand.jsonl`)
//! - **Compact to stderr**
//!
//! # Usage
//!
//! ```rust,ignore
//! use flash_expand::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init();
//! tracing::info!(snippet_id = "abc", "Inserted text");
//! ```
//!
//! Each file line is one JSON object:
//! ```json
//! {"timestamp":"2026-01-05T10:30:45.123Z","level":"INFO","target":"flash_expand::insertion","fields":{"message":"Inserted text","chars":23}}
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "flash-expand.jsonl";

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info,notify=warn";

/// Flushes and closes the log file when dropped
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the file and stderr layers.
///
/// The returned guard must be held until exit; dropping it flushes pending
/// lines. If the log file cannot be opened, file output is discarded and
/// stderr logging still works.
pub fn init() -> LoggingGuard {
    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }
    let log_path = log_dir.join(LOG_FILE_NAME);

    let writer: Box<dyn Write + Send> = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open {}: {}", log_path.display(), e);
            Box::new(std::io::sink())
        }
    };
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(writer);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .init();

    tracing::debug!(log_path = %log_path.display(), "Logging initialized");

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// `~/.flash-expand/logs`, or a temp dir when there is no home directory
fn get_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".flash-expand").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("flash-expand-logs"))
}

pub fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_file_name() {
        let path = log_path();
        assert_eq!(path.file_name().unwrap(), LOG_FILE_NAME);
        assert!(path.parent().unwrap().ends_with("logs"));
    }
}
