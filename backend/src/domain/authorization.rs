//! Authorization gate deciding whether an action may proceed.
//!
//! The gate asks the identity provider for the caller's session only when an
//! action requires one. It fails closed: a missing session, a provider error,
//! and a provider that does not answer within the lookup timeout all deny the
//! request with the same public message. The reason is kept as the error's
//! cause for logging.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::ports::IdentityProvider;
use super::{RequestContext, Session, UnauthorizedError};

/// Default upper bound on a session lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Session check run before protected actions.
#[derive(Clone)]
pub struct AuthorizationGate {
    identity: Arc<dyn IdentityProvider>,
    lookup_timeout: Duration,
}

impl AuthorizationGate {
    /// Gate backed by `identity` with [`DEFAULT_LOOKUP_TIMEOUT`].
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the session lookup timeout.
    #[must_use]
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Resolve the caller's session when `require` is set.
    ///
    /// Returns `Ok(None)` without contacting the provider when no session is
    /// required.
    ///
    /// # Errors
    /// Returns [`UnauthorizedError`] when a session is required but cannot be
    /// established.
    pub async fn authorize(
        &self,
        require: bool,
        context: &RequestContext,
    ) -> Result<Option<Session>, UnauthorizedError> {
        if !require {
            return Ok(None);
        }
        let lookup = self.identity.get_session(context);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(session))) => {
                debug!(user_id = session.id(), "session established");
                Ok(Some(session))
            }
            Ok(Ok(None)) => Err(UnauthorizedError::generic().with_cause("no active session")),
            Ok(Err(err)) => Err(UnauthorizedError::generic().with_cause(err.to_string())),
            Err(_) => Err(UnauthorizedError::generic().with_cause(format!(
                "session lookup exceeded {} ms",
                self.lookup_timeout.as_millis()
            ))),
        }
    }
}
