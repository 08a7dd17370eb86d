//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod action_logger;
mod identity_provider;

#[cfg(test)]
pub use action_logger::MockActionLogger;
pub use action_logger::{ActionLogger, LogLevel, NoOpActionLogger};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FIXTURE_SESSION_TOKEN, FixtureIdentityProvider, IdentityProvider, IdentityProviderError,
    SESSION_COOKIE, SocialProvider, SocialProviderValidationError,
};
