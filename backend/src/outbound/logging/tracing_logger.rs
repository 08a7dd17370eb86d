//! `tracing`-backed action logger.
//!
//! Records are emitted as structured events so the JSON subscriber installed
//! at startup renders one line per failure with the payload attached.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{ActionLogger, LogLevel};

/// Action logger emitting `tracing` events under the `actions` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActionLogger;

impl ActionLogger for TracingActionLogger {
    fn log(&self, level: LogLevel, payload: &Value, message: &str) {
        let trace_id = payload.get("traceId").and_then(Value::as_str);
        match level {
            LogLevel::Debug => {
                debug!(target: "actions", trace_id, payload = %payload, "{message}");
            }
            LogLevel::Info => {
                info!(target: "actions", trace_id, payload = %payload, "{message}");
            }
            LogLevel::Warn => {
                warn!(target: "actions", trace_id, payload = %payload, "{message}");
            }
            LogLevel::Error => {
                error!(target: "actions", trace_id, payload = %payload, "{message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Smoke coverage; the subscriber decides what reaches the output.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(LogLevel::Debug)]
    #[case(LogLevel::Info)]
    #[case(LogLevel::Warn)]
    #[case(LogLevel::Error)]
    fn logs_without_a_subscriber(#[case] level: LogLevel) {
        let payload = json!({ "action": "publicPost", "traceId": null });
        TracingActionLogger.log(level, &payload, "publicPost failed: boom");
    }
}
