//! Folding arbitrary failures into a uniform shape.

use std::error::Error as StdError;

use serde::Serialize;
use serde_json::Value;

use super::{
    ActionError, ErrorKind, GENERIC_ERROR_MESSAGE, SCHEMA_VALIDATION_FAILED_MESSAGE,
    UnauthorizedError, UnknownError, ValidationError,
};
use crate::domain::schema::{FieldErrors, SchemaError};

/// Anything an action can fail with.
///
/// Conversions exist for the action error types, schema failures, plain
/// messages, JSON values, boxed foreign errors, and `Option`s of any of
/// these, so call sites can hand over whatever they caught.
#[derive(Debug)]
pub enum Fault {
    /// Already classified action failure.
    Action(ActionError),
    /// Result of a schema parse.
    Schema(SchemaError),
    /// Raw field errors.
    FieldErrors(FieldErrors),
    /// Error from outside the action taxonomy.
    Foreign(Box<dyn StdError + Send + Sync>),
    /// Bare message.
    Text(String),
    /// Arbitrary JSON value, such as a payload thrown by a client library.
    Json(Value),
    /// No failure value at all.
    Absent,
}

impl Fault {
    /// Box a foreign error.
    pub fn foreign<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Foreign(Box::new(error))
    }
}

macro_rules! fault_from {
    ($($source:ty => $variant:ident $(via $wrap:path)?),* $(,)?) => {
        $(
            impl From<$source> for Fault {
                fn from(value: $source) -> Self {
                    Self::$variant($($wrap)?(value))
                }
            }
        )*
    };
}

fault_from! {
    ActionError => Action,
    ValidationError => Action via ActionError::Validation,
    UnauthorizedError => Action via ActionError::Unauthorized,
    UnknownError => Action via ActionError::Unknown,
    SchemaError => Schema,
    FieldErrors => FieldErrors,
    Box<dyn StdError + Send + Sync> => Foreign,
    String => Text,
    Value => Json,
}

impl From<&str> for Fault {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T: Into<Fault>> From<Option<T>> for Fault {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Uniform description of a failure.
///
/// Serialises as `{"kind", "message", "fieldErrors"?, "detail"?}`. The
/// `detail` field carries internal diagnostics such as an error's source
/// chain and must only reach logs, never callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl NormalizedError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_owned()
        } else {
            message
        };
        Self {
            kind,
            message,
            field_errors: None,
            detail: None,
        }
    }

    fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail.filter(|text| !text.trim().is_empty());
        self
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Full message, suitable for logs.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Itemised violations for validation failures.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.field_errors.as_ref()
    }

    /// Internal diagnostics.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Message safe to show callers.
    ///
    /// Validation and authorisation messages are already caller-facing.
    /// Unknown failures may describe internals, so callers get
    /// [`GENERIC_ERROR_MESSAGE`] instead.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self.kind {
            ErrorKind::Unknown => GENERIC_ERROR_MESSAGE,
            ErrorKind::Validation | ErrorKind::Unauthorized => self.message(),
        }
    }
}

impl From<ActionError> for NormalizedError {
    fn from(value: ActionError) -> Self {
        normalize(value)
    }
}

/// Fold any failure into a [`NormalizedError`].
///
/// Classified action errors keep their kind. Schema failures become
/// validation errors, or an unknown "Schema validation failed" when no field
/// errors are available. Everything else is unknown, with the best message
/// that can be recovered and [`GENERIC_ERROR_MESSAGE`] as the last resort.
///
/// # Examples
/// ```
/// use server_actions::domain::{ErrorKind, normalize};
///
/// let normalized = normalize("boom");
/// assert_eq!(normalized.kind(), ErrorKind::Unknown);
/// assert_eq!(normalized.message(), "boom");
/// ```
pub fn normalize(fault: impl Into<Fault>) -> NormalizedError {
    match fault.into() {
        Fault::Action(error) => from_action(error),
        Fault::Schema(SchemaError::Invalid(errors)) | Fault::FieldErrors(errors) => {
            from_field_errors(errors)
        }
        Fault::Schema(SchemaError::Decode { message }) => {
            NormalizedError::unknown(SCHEMA_VALIDATION_FAILED_MESSAGE).with_detail(Some(message))
        }
        Fault::Foreign(error) => from_foreign(error),
        Fault::Text(message) => NormalizedError::unknown(message),
        Fault::Json(value) => from_json(&value),
        Fault::Absent => NormalizedError::unknown(GENERIC_ERROR_MESSAGE),
    }
}

fn from_action(error: ActionError) -> NormalizedError {
    match error {
        ActionError::Validation(err) => {
            let mut normalized = NormalizedError::new(ErrorKind::Validation, err.message());
            normalized.field_errors = Some(err.into_field_errors());
            normalized
        }
        ActionError::Unauthorized(err) => {
            NormalizedError::new(ErrorKind::Unauthorized, err.message())
                .with_detail(err.cause().map(str::to_owned))
        }
        ActionError::Unknown(err) => NormalizedError::unknown(err.message()),
    }
}

fn from_field_errors(errors: FieldErrors) -> NormalizedError {
    match ValidationError::try_new(errors) {
        Ok(err) => from_action(err.into()),
        Err(_) => NormalizedError::unknown(SCHEMA_VALIDATION_FAILED_MESSAGE),
    }
}

fn from_foreign(error: Box<dyn StdError + Send + Sync>) -> NormalizedError {
    let error = match error.downcast::<ActionError>() {
        Ok(action) => return from_action(*action),
        Err(other) => other,
    };
    let error = match error.downcast::<ValidationError>() {
        Ok(err) => return from_action((*err).into()),
        Err(other) => other,
    };
    let error = match error.downcast::<UnauthorizedError>() {
        Ok(err) => return from_action((*err).into()),
        Err(other) => other,
    };
    let error = match error.downcast::<UnknownError>() {
        Ok(err) => return from_action((*err).into()),
        Err(other) => other,
    };
    let error = match error.downcast::<SchemaError>() {
        Ok(err) => return normalize(*err),
        Err(other) => other,
    };
    NormalizedError::unknown(error.to_string()).with_detail(source_chain(error.as_ref()))
}

fn source_chain(error: &(dyn StdError + 'static)) -> Option<String> {
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    (!causes.is_empty()).then(|| causes.join(": "))
}

fn from_json(value: &Value) -> NormalizedError {
    match value {
        Value::Null => NormalizedError::unknown(GENERIC_ERROR_MESSAGE),
        Value::String(message) => NormalizedError::unknown(message.as_str()),
        Value::Object(object) => match object.get("message").and_then(Value::as_str) {
            Some(message) => NormalizedError::unknown(message),
            None => NormalizedError::unknown(value.to_string()),
        },
        other => NormalizedError::unknown(other.to_string()),
    }
}
