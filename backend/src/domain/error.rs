//! Action error taxonomy.
//!
//! Every action failure is one of three kinds: the input was invalid, the
//! caller was not authorised, or something unexpected happened. These types
//! are transport agnostic. Inbound adapters map them to status codes and
//! response envelopes.

mod normalize;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schema::FieldErrors;

pub use normalize::{Fault, NormalizedError, normalize};

/// Message returned to callers that fail the authorisation gate.
pub const UNAUTHORIZED_MESSAGE: &str = "User Unauthorized";
/// Message substituted when a failure carries no usable description.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";
/// Message used when validation fails without itemised field errors.
pub const SCHEMA_VALIDATION_FAILED_MESSAGE: &str = "Schema validation failed";

/// Stable machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The input failed schema validation.
    Validation,
    /// The caller has no session but the action requires one.
    Unauthorized,
    /// Any other failure.
    Unknown,
}

impl ErrorKind {
    /// Wire representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when constructing a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationErrorBuildError {
    /// A validation error must name at least one field.
    #[error("validation errors require at least one field error")]
    EmptyFieldErrors,
}

/// Input rejected by schema validation.
///
/// ## Invariants
/// - `field_errors` is non-empty.
///
/// # Examples
/// ```
/// use server_actions::domain::ValidationError;
/// use server_actions::domain::schema::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.push_raw("title", "Title too long");
/// let err = ValidationError::try_new(errors).expect("non-empty field errors");
/// assert_eq!(err.message(), "Title too long");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    field_errors: FieldErrors,
    message: String,
}

impl ValidationError {
    /// Build a validation error from itemised field errors.
    pub fn try_new(field_errors: FieldErrors) -> Result<Self, ValidationErrorBuildError> {
        if field_errors.is_empty() {
            return Err(ValidationErrorBuildError::EmptyFieldErrors);
        }
        let message = field_errors.summary();
        Ok(Self {
            field_errors,
            message,
        })
    }

    /// Violations keyed by field path.
    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Human-readable summary of every violation.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Consume the error, yielding the field errors.
    #[must_use]
    pub fn into_field_errors(self) -> FieldErrors {
        self.field_errors
    }
}

/// Caller lacks the session an action requires.
///
/// The public message never reveals why the session could not be resolved.
/// The `cause` is kept for logs only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UnauthorizedError {
    message: String,
    cause: Option<String>,
}

impl UnauthorizedError {
    /// Error carrying the standard public message.
    #[must_use]
    pub fn generic() -> Self {
        Self::new(UNAUTHORIZED_MESSAGE)
    }

    /// Error with a custom public message; blank messages fall back to the
    /// standard one.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: non_blank_or(message.into(), UNAUTHORIZED_MESSAGE),
            cause: None,
        }
    }

    /// Attach the internal reason the session was unavailable.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Public message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Internal reason, if one was recorded.
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

/// Failure outside the validation and authorisation categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UnknownError {
    message: String,
}

impl UnknownError {
    /// Wrap a message; blank messages become [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: non_blank_or(message.into(), GENERIC_ERROR_MESSAGE),
        }
    }

    /// Failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Failure of a server action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// See [`UnauthorizedError`].
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),
    /// See [`UnknownError`].
    #[error(transparent)]
    Unknown(#[from] UnknownError),
}

impl ActionError {
    /// Shorthand for an [`UnknownError`].
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(UnknownError::new(message))
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(err) => err.message(),
            Self::Unauthorized(err) => err.message(),
            Self::Unknown(err) => err.message(),
        }
    }

    /// Field errors for validation failures.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(err) => Some(err.field_errors()),
            Self::Unauthorized(_) | Self::Unknown(_) => None,
        }
    }
}

fn non_blank_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}
