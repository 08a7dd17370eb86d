//! Failure envelope shared by every action endpoint.
//!
//! Successful responses carry `"success": true` next to the action's own
//! fields; see the response types in [`super::actions`] and
//! [`super::session`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::NormalizedError;
use crate::domain::schema::FieldErrors;

/// Body of every failed action response.
///
/// Serialises as `{"success": false, "error": string, "fieldErrors"?: {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureEnvelope {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Caller-safe message.
    #[schema(example = "Title must be at least 3 characters")]
    pub error: String,
    /// Per-field violations for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(
        value_type = Option<std::collections::BTreeMap<String, Vec<String>>>,
        example = json!({ "title": ["Title must be at least 3 characters"] })
    )]
    pub field_errors: Option<FieldErrors>,
}

impl FailureEnvelope {
    /// Envelope with a message and no field errors.
    #[must_use]
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            field_errors: None,
        }
    }
}

impl From<&NormalizedError> for FailureEnvelope {
    fn from(value: &NormalizedError) -> Self {
        Self {
            success: false,
            error: value.public_message().to_owned(),
            field_errors: value.field_errors().cloned(),
        }
    }
}

/// Body of a successful action without further fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Acknowledged {
    /// Always `true`.
    pub success: bool,
}

impl Acknowledged {
    /// The only acknowledgement.
    pub const OK: Self = Self { success: true };
}
