//! Correlation identifier carried by every action invocation.
//!
//! The [`crate::Trace`] middleware scopes one identifier per request in
//! task-local storage and stores a copy in the request extensions.
//! [`crate::domain::RequestContext`] captures it so normalised error logs and
//! failure responses can be correlated without threading the value through
//! every call.
//!
//! Tokio task-locals are not inherited by spawned tasks. Wrap spawned futures
//! with [`TraceId::scope`] when work leaves the request task.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used to accept a caller-supplied identifier and to echo the active
/// one on every response.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT_TRACE_ID: TraceId;
}

/// Request-scoped trace identifier.
///
/// # Examples
/// ```
/// use server_actions::TraceId;
///
/// let id = TraceId::from_header(" 00000000-0000-0000-0000-000000000000 ")
///     .expect("valid header value");
/// assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
/// assert!(TraceId::from_header("not-a-uuid").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a caller-supplied header value.
    ///
    /// Blank or malformed values yield `None` so the caller can fall back to a
    /// generated identifier.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    /// Identifier in scope for the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT_TRACE_ID.try_with(|id| *id).ok()
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Drive `fut` with `trace_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use server_actions::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let trace_id = TraceId::generate();
    /// let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT_TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
