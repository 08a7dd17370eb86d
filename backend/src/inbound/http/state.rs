//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;

use super::error::ActionFailure;
use crate::domain::ports::{ActionLogger, IdentityProvider};
use crate::domain::{
    ActionPipeline, AuthorizationGate, DEFAULT_LOOKUP_TIMEOUT, ErrorReporter, Fault,
    RequestContext,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub logger: Arc<dyn ActionLogger>,
    pub clock: Arc<dyn Clock + Send + Sync>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub pipeline: ActionPipeline,
    pub gate: AuthorizationGate,
    pub identity: Arc<dyn IdentityProvider>,
    pub reporter: ErrorReporter,
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl HttpState {
    /// Build handler state with the default session lookup timeout.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_lookup_timeout(ports, DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Build handler state bounding session lookups by `lookup_timeout`.
    #[must_use]
    pub fn with_lookup_timeout(ports: HttpStatePorts, lookup_timeout: Duration) -> Self {
        let HttpStatePorts {
            identity,
            logger,
            clock,
        } = ports;
        let gate = AuthorizationGate::new(identity.clone()).with_lookup_timeout(lookup_timeout);
        Self {
            pipeline: ActionPipeline::new(gate.clone()),
            gate,
            identity,
            reporter: ErrorReporter::new(logger),
            clock,
        }
    }

    /// Report `fault` for `action` and turn it into a response error.
    pub fn fail(
        &self,
        action: &str,
        fault: impl Into<Fault>,
        context: &RequestContext,
    ) -> ActionFailure {
        let normalized = self.reporter.report(action, fault, Some(context));
        ActionFailure::new(normalized, context.trace_id())
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
