//! Domain primitives and services for server actions.
//!
//! Purpose: validate untrusted action input, gate protected actions on a
//! session, and fold every failure into one normalised shape. Nothing here
//! knows about HTTP; inbound adapters translate these types into responses.
//!
//! Public surface:
//! - [`ActionPipeline`] runs validation then authorisation for one action.
//! - [`AuthorizationGate`] resolves sessions through [`ports::IdentityProvider`].
//! - [`ActionError`] and [`normalize`] describe failures.
//! - [`ErrorReporter`] normalises and logs failures through
//!   [`ports::ActionLogger`].
//! - [`schema`] holds the declarative validator.

pub mod accounts;
pub mod action;
pub mod authorization;
pub mod error;
pub mod ports;
pub mod posts;
pub mod reporting;
pub mod request_context;
pub mod schema;
pub mod session;
pub mod trace_id;

pub use self::action::{
    ActionOptions, ActionPipeline, ActionResult, ActionSuccess, PipelineStage, StageOutcome,
};
pub use self::authorization::{AuthorizationGate, DEFAULT_LOOKUP_TIMEOUT};
pub use self::error::{
    ActionError, ErrorKind, Fault, GENERIC_ERROR_MESSAGE, NormalizedError,
    SCHEMA_VALIDATION_FAILED_MESSAGE, UNAUTHORIZED_MESSAGE, UnauthorizedError, UnknownError,
    ValidationError, ValidationErrorBuildError, normalize,
};
pub use self::reporting::ErrorReporter;
pub use self::request_context::RequestContext;
pub use self::session::{Session, SessionValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
