//! OpenAPI schema definitions for domain types and request bodies.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! Request body schemas describe what the action schemas accept. Handlers
//! still receive raw JSON so that validation failures are reported per field
//! instead of as a single decode error.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::Session`].
#[derive(ToSchema)]
#[schema(as = SessionUser)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SessionUserSchema {
    /// Stable user identifier.
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    id: String,
    /// Email address.
    #[schema(example = "ada@example.com")]
    email: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    name: Option<String>,
    /// Avatar URL.
    image: Option<String>,
}

/// OpenAPI schema for [`crate::domain::posts::Post`].
#[derive(ToSchema)]
#[schema(as = Post)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PostSchema {
    /// Post title.
    #[schema(example = "Valid Title")]
    title: String,
    /// Post body.
    content: String,
    /// Up to five tags.
    tags: Option<Vec<String>>,
    /// Whether the post is visible.
    published: bool,
    /// Random post identifier.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Author's user id.
    author_id: String,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// Request body for `POST /api/v1/actions/posts/public`.
#[derive(ToSchema)]
#[schema(as = PublicPostRequest)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PublicPostRequestSchema {
    /// Non-empty payload.
    #[schema(min_length = 1, example = "hello")]
    data: String,
    /// Optional extra payload.
    optional_field: Option<String>,
}

/// Request body for `POST /api/v1/actions/posts/protected`.
#[derive(ToSchema)]
#[schema(as = ProtectedPostRequest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProtectedPostRequestSchema {
    /// Non-empty payload.
    #[schema(min_length = 1, example = "hello")]
    data: String,
    /// Optional title of at least three characters.
    #[schema(min_length = 3)]
    title: Option<String>,
    /// Optional positive amount.
    #[schema(exclusive_minimum = 0.0)]
    amount: Option<f64>,
}

/// Request body for `POST /api/v1/actions/posts`.
#[derive(ToSchema)]
#[schema(as = CreatePostRequest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreatePostRequestSchema {
    /// Title between 3 and 100 characters.
    #[schema(min_length = 3, max_length = 100, example = "Valid Title")]
    title: String,
    /// Body of at least 10 characters.
    #[schema(min_length = 10)]
    content: String,
    /// Up to five tags.
    #[schema(max_items = 5)]
    tags: Option<Vec<String>>,
    /// Defaults to `false`.
    #[schema(default = false)]
    published: Option<bool>,
}

/// Request body for `POST /api/v1/actions/accounts/validate`.
#[derive(ToSchema)]
#[schema(as = ValidateAccountRequest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ValidateAccountRequestSchema {
    #[schema(format = Email, example = "ada@example.com")]
    email: String,
    /// At least eight characters.
    #[schema(min_length = 8)]
    password: String,
    /// At least three characters.
    #[schema(min_length = 3, example = "ada")]
    username: String,
}
