//! Identity provider outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `IdentityProvider`
//! port for a better-auth compatible service.

mod dto;
mod http_provider;

pub use http_provider::HttpIdentityProvider;
