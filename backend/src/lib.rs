//! Server actions library modules.
//!
//! Actions validate their input against a schema, optionally require a
//! session, and report every failure through one normalised error shape.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
