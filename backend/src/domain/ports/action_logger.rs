//! Driven port for structured action logs.

use serde_json::Value;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Routine events.
    Info,
    /// Expected failures such as rejected input.
    Warn,
    /// Unexpected failures.
    Error,
}

/// Sink for structured action records.
///
/// Each call receives a JSON payload and a human-readable message. The
/// logger must not block the caller for long and must not fail.
#[cfg_attr(test, mockall::automock)]
pub trait ActionLogger: Send + Sync {
    /// Emit one record.
    fn log(&self, level: LogLevel, payload: &Value, message: &str);
}

/// Logger that discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpActionLogger;

impl ActionLogger for NoOpActionLogger {
    fn log(&self, _level: LogLevel, _payload: &Value, _message: &str) {}
}
