//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the action API. It registers:
//!
//! - **Paths**: every action endpoint from the inbound layer (posts, accounts,
//!   session)
//! - **Schemas**: the failure envelope, response bodies, and wrappers such as
//!   [`PostSchema`] that describe domain types without coupling them to utoipa
//! - **Security**: the identity provider's session cookie
//!
//! The generated specification is served by Swagger UI when docs are enabled
//! and exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::ErrorKind;
use crate::domain::ports::SESSION_COOKIE;
use crate::inbound::http::actions::{
    ActionUser, CreatePostResponse, ProtectedPostResponse, PublicPostResponse,
    ValidateAccountResponse,
};
use crate::inbound::http::envelope::{Acknowledged, FailureEnvelope};
use crate::inbound::http::schemas::{
    CreatePostRequestSchema, PostSchema, ProtectedPostRequestSchema, PublicPostRequestSchema,
    SessionUserSchema, ValidateAccountRequestSchema,
};
use crate::inbound::http::session::SessionResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Session cookie issued by the identity provider after sign-in.",
            ))),
        );
    }
}

/// OpenAPI document for the action API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Server actions API",
        description = "Validated, optionally authenticated actions with a uniform failure envelope.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::actions::public_post,
        crate::inbound::http::actions::protected_post,
        crate::inbound::http::actions::create_post,
        crate::inbound::http::actions::validate_account,
        crate::inbound::http::session::get_session,
        crate::inbound::http::session::sign_out,
        crate::inbound::http::session::sign_in_social,
    ),
    components(schemas(
        FailureEnvelope,
        Acknowledged,
        ErrorKind,
        SessionResponse,
        SessionUserSchema,
        ActionUser,
        PublicPostResponse,
        ProtectedPostResponse,
        CreatePostResponse,
        PostSchema,
        PublicPostRequestSchema,
        ProtectedPostRequestSchema,
        CreatePostRequestSchema,
        ValidateAccountResponse,
        ValidateAccountRequestSchema
    )),
    tags(
        (name = "actions", description = "Validated post and account actions"),
        (name = "session", description = "Session lookup, sign-in, and sign-out")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/actions/posts/public")]
    #[case("/api/v1/actions/posts/protected")]
    #[case("/api/v1/actions/posts")]
    #[case("/api/v1/actions/accounts/validate")]
    #[case("/api/v1/actions/session")]
    #[case("/api/v1/actions/sign-out")]
    #[case("/api/v1/actions/sign-in/{provider}")]
    fn every_action_path_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn failure_envelope_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get("FailureEnvelope").expect("FailureEnvelope schema");

        assert_object_schema_has_field(envelope, "success");
        assert_object_schema_has_field(envelope, "error");
        assert_object_schema_has_field(envelope, "fieldErrors");
    }

    #[test]
    fn post_schema_is_registered_under_its_wire_name() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let post = schemas.get("Post").expect("Post schema");

        assert_object_schema_has_field(post, "authorId");
        assert_object_schema_has_field(post, "createdAt");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
