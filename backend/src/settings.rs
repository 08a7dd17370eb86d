//! Server configuration loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file, or an
//! `ACTIONS_`-prefixed environment variable. Missing values fall back to the
//! defaults below.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_SESSION_LOOKUP_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The identity provider URL is not absolute.
    #[error("invalid identity provider URL {value:?}: {source}")]
    IdentityUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration values controlling the action server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACTIONS")]
pub struct ActionSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// Base URL of the identity provider; the fixture provider is used when
    /// unset.
    pub identity_base_url: Option<String>,
    /// Per-request timeout for identity provider calls, in milliseconds.
    pub identity_timeout_ms: Option<u64>,
    /// Upper bound on a session lookup made by the authorisation gate, in
    /// milliseconds.
    pub session_lookup_timeout_ms: Option<u64>,
    /// Serve Swagger UI at `/docs`; on by default in debug builds only.
    ///
    /// Set through the environment or a configuration file.
    #[ortho_config(default = cfg!(debug_assertions), skip_cli)]
    pub docs_enabled: bool,
}

impl ActionSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the identity provider base URL, if one is configured.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IdentityUrl`] when the value does not parse.
    pub fn identity_base_url(&self) -> Result<Option<Url>, SettingsError> {
        self.identity_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::IdentityUrl {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    /// Return the identity provider request timeout.
    #[must_use]
    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(
            self.identity_timeout_ms.unwrap_or(DEFAULT_IDENTITY_TIMEOUT_MS),
        )
    }

    /// Return the session lookup bound applied by the authorisation gate.
    #[must_use]
    pub fn session_lookup_timeout(&self) -> Duration {
        Duration::from_millis(
            self.session_lookup_timeout_ms
                .unwrap_or(DEFAULT_SESSION_LOOKUP_TIMEOUT_MS),
        )
    }

    /// Whether Swagger UI is served.
    #[must_use]
    pub const fn docs_enabled(&self) -> bool {
        self.docs_enabled
    }
}
