//! Action pipeline: validate, then authorise, then hand over.
//!
//! Every server action runs its input through [`ActionPipeline::run`] before
//! executing business logic. Validation always happens first, so malformed
//! input is rejected without a session lookup. The identity provider is
//! consulted only when the action asks for authorisation and the input is
//! valid.
//!
//! ```text
//! Validating --passed--> Authorizing --passed--> Success
//!     |   \                   |
//!     |    \--passed, no auth-------------------> Success
//!   rejected               rejected
//!     v                       v
//!   Failed                  Failed
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::authorization::AuthorizationGate;
use super::schema::{ObjectSchema, SchemaError};
use super::{
    ActionError, RequestContext, SCHEMA_VALIDATION_FAILED_MESSAGE, Session, UnknownError,
    ValidationError,
};

/// Stage of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Checking the input against the schema.
    Validating,
    /// Resolving the caller's session.
    Authorizing,
    /// Input valid and caller authorised.
    Success,
    /// Run ended with an error.
    Failed,
}

/// Result of the stage currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage accepted the request.
    Passed,
    /// The stage rejected the request.
    Rejected,
}

impl PipelineStage {
    /// Stage following `self` given its outcome.
    ///
    /// Terminal stages never advance.
    ///
    /// # Examples
    /// ```
    /// use server_actions::domain::{PipelineStage, StageOutcome};
    ///
    /// let next = PipelineStage::Validating.next(StageOutcome::Passed, true);
    /// assert_eq!(next, PipelineStage::Authorizing);
    /// let next = PipelineStage::Validating.next(StageOutcome::Passed, false);
    /// assert_eq!(next, PipelineStage::Success);
    /// ```
    #[must_use]
    pub const fn next(self, outcome: StageOutcome, authorize: bool) -> Self {
        match (self, outcome) {
            (Self::Validating, StageOutcome::Passed) if authorize => Self::Authorizing,
            (Self::Validating | Self::Authorizing, StageOutcome::Passed) => Self::Success,
            (Self::Validating | Self::Authorizing, StageOutcome::Rejected) => Self::Failed,
            (terminal @ (Self::Success | Self::Failed), _) => terminal,
        }
    }

    /// Whether the run has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// Input to one pipeline run.
#[derive(Debug, Clone)]
pub struct ActionOptions<'a> {
    /// Untrusted caller input.
    pub params: Value,
    /// Schema the input must satisfy.
    pub schema: &'a ObjectSchema,
    /// Whether the caller must hold a session.
    pub authorize: bool,
}

impl<'a> ActionOptions<'a> {
    /// Options for a public action.
    #[must_use]
    pub fn new(params: Value, schema: &'a ObjectSchema) -> Self {
        Self {
            params,
            schema,
            authorize: false,
        }
    }

    /// Require a session.
    #[must_use]
    pub fn authorized(mut self) -> Self {
        self.authorize = true;
        self
    }
}

/// Validated input plus the session established for it.
///
/// `session` is present only when authorisation was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSuccess<T> {
    /// Typed, defaulted input.
    pub params: T,
    /// Caller session, when the action required one.
    pub session: Option<Session>,
}

/// Outcome of [`ActionPipeline::run`].
pub type ActionResult<T> = Result<ActionSuccess<T>, ActionError>;

/// Shared validate-then-authorise pipeline.
#[derive(Clone)]
pub struct ActionPipeline {
    gate: AuthorizationGate,
}

impl ActionPipeline {
    /// Pipeline consulting `gate` for protected actions.
    #[must_use]
    pub const fn new(gate: AuthorizationGate) -> Self {
        Self { gate }
    }

    /// Validate `options.params`, authorise if requested, and return the
    /// typed input.
    ///
    /// # Errors
    /// - [`ActionError::Validation`] when the input violates the schema.
    /// - [`ActionError::Unauthorized`] when a required session is missing.
    /// - [`ActionError::Unknown`] when validated input does not decode into
    ///   `T`.
    pub async fn run<T: DeserializeOwned>(
        &self,
        options: ActionOptions<'_>,
        context: &RequestContext,
    ) -> ActionResult<T> {
        let mut stage = PipelineStage::Validating;
        let params = match options.schema.parse::<T>(&options.params) {
            Ok(params) => params,
            Err(err) => {
                stage = stage.next(StageOutcome::Rejected, options.authorize);
                debug!(?stage, "input rejected");
                return Err(schema_failure(err));
            }
        };
        stage = stage.next(StageOutcome::Passed, options.authorize);
        debug!(?stage, "input validated");

        if stage != PipelineStage::Authorizing {
            return Ok(ActionSuccess {
                params,
                session: None,
            });
        }

        match self.gate.authorize(true, context).await {
            Ok(session) => {
                stage = stage.next(StageOutcome::Passed, true);
                debug!(?stage, "caller authorised");
                Ok(ActionSuccess { params, session })
            }
            Err(err) => {
                stage = stage.next(StageOutcome::Rejected, true);
                debug!(?stage, "caller rejected");
                Err(err.into())
            }
        }
    }
}

fn schema_failure(err: SchemaError) -> ActionError {
    match err {
        SchemaError::Invalid(errors) => match ValidationError::try_new(errors) {
            Ok(validation) => validation.into(),
            Err(_) => UnknownError::new(SCHEMA_VALIDATION_FAILED_MESSAGE).into(),
        },
        SchemaError::Decode { message } => {
            debug!(%message, "validated input failed to decode");
            UnknownError::new(SCHEMA_VALIDATION_FAILED_MESSAGE).into()
        }
    }
}

#[cfg(test)]
mod tests;
