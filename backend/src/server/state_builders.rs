//! Builders for HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use server_actions::domain::ports::{FixtureIdentityProvider, IdentityProvider};
use server_actions::inbound::http::state::{HttpState, HttpStatePorts};
use server_actions::outbound::identity::HttpIdentityProvider;
use server_actions::outbound::logging::TracingActionLogger;

use super::ServerConfig;

/// Select the identity provider: the HTTP adapter when an endpoint is
/// configured, otherwise the fixture.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the HTTP client cannot be constructed.
fn build_identity_provider(config: &ServerConfig) -> std::io::Result<Arc<dyn IdentityProvider>> {
    match &config.identity {
        Some(endpoint) => {
            info!(base_url = %endpoint.base_url, "using HTTP identity provider");
            let provider = HttpIdentityProvider::new(endpoint.base_url.clone(), endpoint.timeout)
                .map_err(|err| {
                    std::io::Error::other(format!("identity provider client failed: {err}"))
                })?;
            Ok(Arc::new(provider))
        }
        None => {
            info!("no identity provider configured; using fixture sessions");
            Ok(Arc::new(FixtureIdentityProvider))
        }
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let identity = build_identity_provider(config)?;
    Ok(web::Data::new(HttpState::with_lookup_timeout(
        HttpStatePorts {
            identity,
            logger: Arc::new(TracingActionLogger),
            clock: Arc::new(DefaultClock),
        },
        config.session_lookup_timeout,
    )))
}
