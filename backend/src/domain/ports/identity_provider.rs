//! Driven port for the external identity provider.
//!
//! The provider owns sessions. Actions only ask it who the caller is, to end
//! the caller's session, or where to send the caller to start a social
//! sign-in. Adapters translate transport and protocol failures into
//! [`IdentityProviderError`] so the authorization gate can fail closed
//! without inspecting adapter-specific types.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use url::Url;

use super::define_port_error;
use crate::domain::{RequestContext, Session};

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider could not be reached.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "identity provider timed out: {message}",
        /// The provider answered with an unexpected status.
        Rejected { status: u16, message: String } =>
            "identity provider rejected the request with status {status}: {message}",
        /// The provider's response did not have the expected shape.
        Decode { message: String } =>
            "identity provider response could not be decoded: {message}",
        /// The request could not be built.
        InvalidRequest { message: String } =>
            "invalid identity provider request: {message}",
    }
}

/// Validation errors raised by [`SocialProvider::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SocialProviderValidationError {
    /// The identifier was blank.
    #[error("social provider must not be empty")]
    Empty,
    /// The identifier contained characters outside `[a-z0-9-]`.
    #[error("social provider must contain only lowercase letters, digits, or '-': {0}")]
    InvalidCharacters(String),
}

/// Identifier of a social sign-in provider such as `google`.
///
/// # Examples
/// ```
/// use server_actions::domain::ports::SocialProvider;
///
/// let provider = SocialProvider::new("google").expect("valid provider");
/// assert_eq!(provider.as_ref(), "google");
/// assert!(SocialProvider::new("Google!").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocialProvider(String);

impl SocialProvider {
    /// Validate and wrap a provider identifier.
    pub fn new(value: &str) -> Result<Self, SocialProviderValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SocialProviderValidationError::Empty);
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SocialProviderValidationError::InvalidCharacters(
                value.to_owned(),
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// The Google provider.
    #[must_use]
    pub fn google() -> Self {
        Self("google".to_owned())
    }
}

impl AsRef<str> for SocialProvider {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SocialProvider {
    type Err = SocialProviderValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Port for resolving and ending caller sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the caller's session from request metadata.
    ///
    /// `Ok(None)` means the caller is anonymous. Errors mean the provider
    /// could not answer.
    async fn get_session(
        &self,
        context: &RequestContext,
    ) -> Result<Option<Session>, IdentityProviderError>;

    /// End the caller's session.
    async fn sign_out(&self, context: &RequestContext) -> Result<(), IdentityProviderError>;

    /// Begin a social sign-in and return the URL the caller must visit.
    async fn start_social_sign_in(
        &self,
        provider: &SocialProvider,
    ) -> Result<Url, IdentityProviderError>;
}

/// Cookie carrying the provider's session token.
pub const SESSION_COOKIE: &str = "better-auth.session_token";
/// Token accepted by [`FixtureIdentityProvider`].
pub const FIXTURE_SESSION_TOKEN: &str = "fixture-session-token";
const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
const FIXTURE_SIGN_IN_BASE: &str = "https://accounts.example.com/oauth/";

/// In-memory identity provider used when no provider URL is configured.
///
/// Callers presenting [`FIXTURE_SESSION_TOKEN`] in the [`SESSION_COOKIE`]
/// cookie or as a bearer token resolve to a fixed user. Everyone else is
/// anonymous.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

impl FixtureIdentityProvider {
    fn presents_fixture_token(context: &RequestContext) -> bool {
        context.cookie(SESSION_COOKIE) == Some(FIXTURE_SESSION_TOKEN)
            || context.bearer_token() == Some(FIXTURE_SESSION_TOKEN)
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn get_session(
        &self,
        context: &RequestContext,
    ) -> Result<Option<Session>, IdentityProviderError> {
        if !Self::presents_fixture_token(context) {
            return Ok(None);
        }
        Session::try_new(FIXTURE_USER_ID, "ada@example.com")
            .map(|session| Some(session.with_name("Ada Lovelace")))
            .map_err(|err| IdentityProviderError::decode(format!("invalid fixture session: {err}")))
    }

    async fn sign_out(&self, _context: &RequestContext) -> Result<(), IdentityProviderError> {
        Ok(())
    }

    async fn start_social_sign_in(
        &self,
        provider: &SocialProvider,
    ) -> Result<Url, IdentityProviderError> {
        Url::parse(FIXTURE_SIGN_IN_BASE)
            .and_then(|base| base.join(provider.as_ref()))
            .map_err(|err| IdentityProviderError::invalid_request(err.to_string()))
    }
}
