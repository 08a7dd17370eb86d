//! Normalise-and-log step shared by every action failure path.

use std::sync::Arc;

use serde_json::{Value, json};

use super::ports::{ActionLogger, LogLevel};
use super::{ErrorKind, Fault, NormalizedError, RequestContext, TraceId, normalize};

/// Normalises action failures and logs each one exactly once.
#[derive(Clone)]
pub struct ErrorReporter {
    logger: Arc<dyn ActionLogger>,
}

impl ErrorReporter {
    /// Reporter writing to `logger`.
    pub fn new(logger: Arc<dyn ActionLogger>) -> Self {
        Self { logger }
    }

    /// Normalise `fault`, log it, and return the normalised form.
    ///
    /// Validation and authorisation failures are expected and log at
    /// [`LogLevel::Warn`]. Unknown failures log at [`LogLevel::Error`]. The
    /// payload carries the action name, the normalised error, and the trace
    /// id of the request when one is known.
    pub fn report(
        &self,
        action: &str,
        fault: impl Into<Fault>,
        context: Option<&RequestContext>,
    ) -> NormalizedError {
        let normalized = normalize(fault);
        let level = match normalized.kind() {
            ErrorKind::Validation | ErrorKind::Unauthorized => LogLevel::Warn,
            ErrorKind::Unknown => LogLevel::Error,
        };
        let trace_id = context
            .and_then(RequestContext::trace_id)
            .or_else(TraceId::current);
        let payload = json!({
            "action": action,
            "error": serde_json::to_value(&normalized).unwrap_or(Value::Null),
            "traceId": trace_id.map(|id| id.to_string()),
        });
        let message = format!("{action} failed: {}", normalized.message());
        self.logger.log(level, &payload, &message);
        normalized
    }
}
