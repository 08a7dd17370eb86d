//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex, PoisonError};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use super::configure_actions;
use super::state::{HttpState, HttpStatePorts};
use crate::Trace;
use crate::domain::ports::{ActionLogger, IdentityProvider, LogLevel};

/// Instant reported by [`FixtureClock`].
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock frozen at [`fixture_timestamp`].
pub struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

/// One captured log call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub payload: Value,
    pub message: String,
}

/// Logger keeping every record for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    /// Snapshot of the records so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ActionLogger for RecordingLogger {
    fn log(&self, level: LogLevel, payload: &Value, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                level,
                payload: payload.clone(),
                message: message.to_owned(),
            });
    }
}

/// Handler state over `identity`, recording logs into `logger`.
pub fn test_state(
    identity: impl IdentityProvider + 'static,
    logger: Arc<RecordingLogger>,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(HttpStatePorts {
        identity: Arc::new(identity),
        logger,
        clock: Arc::new(FixtureClock),
    }))
}

/// Application exposing the action routes behind the trace middleware.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .configure(configure_actions)
}
