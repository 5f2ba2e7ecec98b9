#![deny(missing_docs)]
//! Shared logging utilities for the blogharvest workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a minimal test initializer for the global logger, and the failure sinks
//! that collect one line per skipped unit of work (post, image, feed page).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

/// Receives one message per failure that caused a unit of work to be skipped.
///
/// Implementations must be safe to call from concurrent post tasks.
pub trait FailureSink: Send + Sync {
    /// Records a single failure line.
    fn record(&self, message: &str);
}

/// Append-only failure log on disk, conventionally `error_log.txt`.
///
/// The file is opened lazily, so no file appears unless something fails.
/// Every recorded line is mirrored to the `error` log level.
pub struct ErrorLogFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ErrorLogFile {
    /// Creates a sink that appends to `path` on the first recorded failure.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FailureSink for ErrorLogFile {
    fn record(&self, message: &str) {
        engine_error!("{}", message);

        let Ok(mut guard) = self.file.lock() else {
            return;
        };
        if guard.is_none() {
            match OpenOptions::new().create(true).append(true).open(&self.path) {
                Ok(file) => *guard = Some(file),
                Err(err) => {
                    engine_warn!("Could not open error log {:?}: {}", self.path, err);
                    return;
                }
            }
        }
        if let Some(file) = guard.as_mut() {
            if let Err(err) = writeln!(file, "{message}") {
                engine_warn!("Could not append to error log {:?}: {}", self.path, err);
            }
        }
    }
}

/// In-memory sink, handy for tests and for callers that report failures themselves.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded line, in recording order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl FailureSink for RecordingSink {
    fn record(&self, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_log_is_created_lazily_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error_log.txt");

        let sink = ErrorLogFile::new(&path);
        assert!(!path.exists());

        sink.record("first failure");
        sink.record("second failure");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first failure\nsecond failure\n");
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.record("a");
        sink.record("b");
        assert_eq!(sink.lines(), vec!["a".to_string(), "b".to_string()]);
    }
}
