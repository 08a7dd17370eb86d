//! HTTP adapter mapping for action failures.
//!
//! Purpose: keep the domain error types HTTP-agnostic while letting Actix
//! handlers turn normalised failures into the failure envelope, a status
//! code, and the `trace-id` header.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use tracing::error;

use super::context::request_context;
use super::envelope::FailureEnvelope;
use super::state::HttpState;
use crate::domain::schema::{FieldErrors, ROOT_PATH};
use crate::domain::{ErrorKind, NormalizedError, TRACE_ID_HEADER, TraceId, normalize};

/// Convenient result alias for action handlers.
pub type ActionResponse = Result<HttpResponse, ActionFailure>;

/// Normalised failure on its way to the caller.
///
/// Build one with [`HttpState::fail`] so the failure is logged exactly once.
#[derive(Debug, thiserror::Error)]
#[error("{}", .normalized.message())]
pub struct ActionFailure {
    normalized: NormalizedError,
    trace_id: Option<TraceId>,
}

impl ActionFailure {
    /// Wrap an already reported failure.
    #[must_use]
    pub const fn new(normalized: NormalizedError, trace_id: Option<TraceId>) -> Self {
        Self {
            normalized,
            trace_id,
        }
    }

    /// The normalised failure.
    #[must_use]
    pub const fn normalized(&self) -> &NormalizedError {
        &self.normalized
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.normalized.kind()
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ActionFailure {
    fn status_code(&self) -> StatusCode {
        status_for(self.normalized.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(FailureEnvelope::from(&self.normalized))
    }
}

/// JSON extractor configuration reporting malformed bodies as validation
/// failures at the root path.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_payload_failure)
}

fn json_payload_failure(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let mut field_errors = FieldErrors::new();
    field_errors.push_raw(ROOT_PATH, format!("Invalid request body: {err}"));
    let context = request_context(req);
    let failure = match req.app_data::<web::Data<HttpState>>() {
        Some(state) => state.fail(req.path(), field_errors, &context),
        None => {
            error!(path = req.path(), "HTTP state missing while rejecting a request body");
            ActionFailure::new(normalize(field_errors), context.trace_id())
        }
    };
    failure.into()
}
