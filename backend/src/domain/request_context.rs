//! Framework-agnostic view of an inbound request.
//!
//! The authorization gate hands this value to the identity provider instead of
//! reaching for ambient request state, so adapters and test doubles see
//! exactly what the caller sent.

use std::collections::BTreeMap;

use super::TraceId;

/// Headers and correlation data for one action invocation.
///
/// Header names are stored lower-cased. Repeated headers are folded into one
/// value: `cookie` values are joined with `"; "`, every other header with
/// `", "`.
///
/// # Examples
/// ```
/// use server_actions::domain::RequestContext;
///
/// let context = RequestContext::new()
///     .with_header("Cookie", "theme=dark")
///     .with_header("cookie", "session_token=abc123")
///     .with_header("Authorization", "Bearer token-1");
///
/// assert_eq!(context.cookie("session_token"), Some("abc123"));
/// assert_eq!(context.bearer_token(), Some("token-1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    headers: BTreeMap<String, String>,
    trace_id: Option<TraceId>,
}

impl RequestContext {
    /// Empty context with no headers and no trace identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, folding repeated names into one value.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.append_header(name, value);
        self
    }

    /// Attach the request trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add a header in place.
    pub fn append_header(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        let separator = if name == "cookie" { "; " } else { ", " };
        self.headers
            .entry(name)
            .and_modify(|existing| {
                existing.push_str(separator);
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    /// Header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All headers in name order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Value of a named cookie from the `cookie` header.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.trim())
    }

    /// Token from an `Authorization: Bearer <token>` header.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        let raw = self.header("authorization")?.trim();
        let (scheme, token) = raw.split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }

    /// Trace identifier of the request, if one was assigned.
    #[must_use]
    pub const fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }
}
