//! Extractor building a [`RequestContext`] from the incoming request.
//!
//! Handlers never read headers themselves. They take an [`ActionContext`] and
//! pass its [`RequestContext`] to the domain, which forwards it to the
//! identity provider untouched.

use std::convert::Infallible;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{RequestContext, TraceId};

/// Request metadata for one action invocation.
#[derive(Debug, Clone)]
pub struct ActionContext(RequestContext);

impl ActionContext {
    /// Borrow the framework-agnostic context.
    #[must_use]
    pub const fn request(&self) -> &RequestContext {
        &self.0
    }

    /// Consume the extractor, yielding the context.
    #[must_use]
    pub fn into_inner(self) -> RequestContext {
        self.0
    }
}

/// Capture every textual header and the trace id of `req`.
///
/// Headers whose values are not visible ASCII are skipped.
pub(crate) fn request_context(req: &HttpRequest) -> RequestContext {
    let mut context = RequestContext::new();
    for (name, value) in req.headers() {
        if let Ok(text) = value.to_str() {
            context.append_header(name.as_str(), text);
        }
    }
    let trace_id = req
        .extensions()
        .get::<TraceId>()
        .copied()
        .or_else(TraceId::current);
    match trace_id {
        Some(id) => context.with_trace_id(id),
        None => context,
    }
}

impl FromRequest for ActionContext {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(request_context(req))))
    }
}
