//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use server_actions::domain::DEFAULT_LOOKUP_TIMEOUT;
use server_actions::settings::{ActionSettings, SettingsError};
use url::Url;

/// Connection details for a remote identity provider.
#[derive(Debug, Clone)]
pub struct IdentityEndpoint {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
}

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) identity: Option<IdentityEndpoint>,
    pub(crate) session_lookup_timeout: Duration,
    pub(crate) docs_enabled: bool,
}

impl ServerConfig {
    /// Construct a configuration serving fixture identities on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            identity: None,
            session_lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            docs_enabled: false,
        }
    }

    /// Construct a configuration from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the bind address or identity provider
    /// URL does not parse.
    pub fn from_settings(settings: &ActionSettings) -> Result<Self, SettingsError> {
        let config = Self::new(settings.bind_addr()?)
            .with_session_lookup_timeout(settings.session_lookup_timeout())
            .with_docs(settings.docs_enabled());
        Ok(match settings.identity_base_url()? {
            Some(base_url) => config.with_identity_provider(base_url, settings.identity_timeout()),
            None => config,
        })
    }

    /// Resolve sessions through the identity provider at `base_url`.
    #[must_use]
    pub fn with_identity_provider(mut self, base_url: Url, timeout: Duration) -> Self {
        self.identity = Some(IdentityEndpoint { base_url, timeout });
        self
    }

    /// Bound every session lookup made by the authorisation gate.
    #[must_use]
    pub const fn with_session_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.session_lookup_timeout = timeout;
        self
    }

    /// Serve Swagger UI at `/docs`.
    #[must_use]
    pub const fn with_docs(mut self, enabled: bool) -> Self {
        self.docs_enabled = enabled;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
