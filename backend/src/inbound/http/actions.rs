//! Action handlers for posts and account checks.
//!
//! ```text
//! POST /api/v1/actions/posts/public    {"data":"hello"}
//! POST /api/v1/actions/posts/protected {"data":"hello","amount":12.5}
//! POST /api/v1/actions/posts           {"title":"Valid Title","content":"Valid content body"}
//! POST /api/v1/actions/accounts/validate {"email":"ada@example.com","password":"correct horse","username":"ada"}
//! ```
//!
//! Every handler runs the raw JSON body through the action pipeline, so
//! malformed input yields per-field errors and protected actions reuse the
//! session the gate resolved.

use std::sync::LazyLock;

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::context::ActionContext;
use super::envelope::FailureEnvelope;
use super::error::{ActionFailure, ActionResponse};
use super::schemas::{
    CreatePostRequestSchema, PostSchema, ProtectedPostRequestSchema, PublicPostRequestSchema,
    ValidateAccountRequestSchema,
};
use super::state::HttpState;
use crate::domain::accounts::{AccountInput, account_schema};
use crate::domain::posts::{
    CreatePostInput, Post, ProtectedPostInput, PublicPostInput, create_post_schema,
    protected_post_schema, public_post_schema,
};
use crate::domain::schema::ObjectSchema;
use crate::domain::{ActionOptions, RequestContext, Session, UnauthorizedError};

/// Action name reported for public post failures.
pub const PUBLIC_POST_ACTION: &str = "publicPost";
/// Action name reported for protected post failures.
pub const PROTECTED_POST_ACTION: &str = "protectedPost";
/// Action name reported for post creation failures.
pub const CREATE_POST_ACTION: &str = "createPost";
/// Action name reported for account check failures.
pub const VALIDATE_ACCOUNT_ACTION: &str = "validateAccount";

static PUBLIC_POST_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(public_post_schema);
static PROTECTED_POST_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(protected_post_schema);
static CREATE_POST_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(create_post_schema);
static ACCOUNT_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(account_schema);

/// Response of the public demo action.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicPostResponse {
    /// Always `true`.
    success: bool,
    #[schema(example = "Public action - no auth required")]
    message: &'static str,
    /// Validated input.
    #[schema(value_type = Object)]
    received_data: PublicPostInput,
    #[schema(value_type = String, format = DateTime)]
    timestamp: DateTime<Utc>,
}

/// Caller identity echoed by the protected demo action.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionUser {
    id: String,
    email: String,
    name: Option<String>,
}

impl From<&Session> for ActionUser {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_owned(),
            email: session.email().to_owned(),
            name: session.name().map(str::to_owned),
        }
    }
}

/// Response of the protected demo action.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedPostResponse {
    /// Always `true`.
    success: bool,
    #[schema(example = "Protected action - auth required")]
    message: &'static str,
    user: ActionUser,
    /// Validated input.
    #[schema(value_type = Object)]
    received_data: ProtectedPostInput,
    #[schema(value_type = String, format = DateTime)]
    timestamp: DateTime<Utc>,
}

/// Response of post creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePostResponse {
    /// Always `true`.
    success: bool,
    #[schema(example = "Post created successfully")]
    message: &'static str,
    #[schema(value_type = PostSchema)]
    post: Post,
}

/// Response of the account check; the password is never echoed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateAccountResponse {
    /// Always `true`.
    success: bool,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "ada")]
    username: String,
}

impl From<AccountInput> for ValidateAccountResponse {
    fn from(input: AccountInput) -> Self {
        Self {
            success: true,
            email: input.email,
            username: input.username,
        }
    }
}

/// Session the pipeline established for a protected action.
///
/// The pipeline always returns one when authorisation was requested; a
/// missing session is still treated as unauthorised.
fn required_session(
    state: &HttpState,
    action: &str,
    session: Option<Session>,
    context: &RequestContext,
) -> Result<Session, ActionFailure> {
    session.ok_or_else(|| {
        state.fail(
            action,
            UnauthorizedError::generic().with_cause("pipeline returned no session"),
            context,
        )
    })
}

/// Public demo action; no session required.
#[utoipa::path(
    post,
    path = "/api/v1/actions/posts/public",
    request_body = PublicPostRequestSchema,
    responses(
        (status = 200, description = "Input accepted", body = PublicPostResponse),
        (status = 400, description = "Invalid input", body = FailureEnvelope),
        (status = 500, description = "Unexpected failure", body = FailureEnvelope)
    ),
    tags = ["actions"],
    operation_id = "publicPost",
    security([])
)]
#[post("/posts/public")]
pub async fn public_post(
    state: web::Data<HttpState>,
    context: ActionContext,
    payload: web::Json<Value>,
) -> ActionResponse {
    let request = context.request();
    let options = ActionOptions::new(payload.into_inner(), &PUBLIC_POST_SCHEMA);
    let success = state
        .pipeline
        .run::<PublicPostInput>(options, request)
        .await
        .map_err(|err| state.fail(PUBLIC_POST_ACTION, err, request))?;
    Ok(HttpResponse::Ok().json(PublicPostResponse {
        success: true,
        message: "Public action - no auth required",
        received_data: success.params,
        timestamp: state.clock.utc(),
    }))
}

/// Protected demo action; requires a session.
#[utoipa::path(
    post,
    path = "/api/v1/actions/posts/protected",
    request_body = ProtectedPostRequestSchema,
    responses(
        (status = 200, description = "Input accepted", body = ProtectedPostResponse),
        (status = 400, description = "Invalid input", body = FailureEnvelope),
        (status = 401, description = "No session", body = FailureEnvelope),
        (status = 500, description = "Unexpected failure", body = FailureEnvelope)
    ),
    tags = ["actions"],
    operation_id = "protectedPost",
    security(("SessionCookie" = []))
)]
#[post("/posts/protected")]
pub async fn protected_post(
    state: web::Data<HttpState>,
    context: ActionContext,
    payload: web::Json<Value>,
) -> ActionResponse {
    let request = context.request();
    let options = ActionOptions::new(payload.into_inner(), &PROTECTED_POST_SCHEMA).authorized();
    let success = state
        .pipeline
        .run::<ProtectedPostInput>(options, request)
        .await
        .map_err(|err| state.fail(PROTECTED_POST_ACTION, err, request))?;
    let session = required_session(&state, PROTECTED_POST_ACTION, success.session, request)?;
    Ok(HttpResponse::Ok().json(ProtectedPostResponse {
        success: true,
        message: "Protected action - auth required",
        user: ActionUser::from(&session),
        received_data: success.params,
        timestamp: state.clock.utc(),
    }))
}

/// Create a post authored by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/actions/posts",
    request_body = CreatePostRequestSchema,
    responses(
        (status = 200, description = "Post created", body = CreatePostResponse),
        (status = 400, description = "Invalid input", body = FailureEnvelope),
        (status = 401, description = "No session", body = FailureEnvelope),
        (status = 500, description = "Unexpected failure", body = FailureEnvelope)
    ),
    tags = ["actions"],
    operation_id = "createPost",
    security(("SessionCookie" = []))
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    context: ActionContext,
    payload: web::Json<Value>,
) -> ActionResponse {
    let request = context.request();
    let options = ActionOptions::new(payload.into_inner(), &CREATE_POST_SCHEMA).authorized();
    let success = state
        .pipeline
        .run::<CreatePostInput>(options, request)
        .await
        .map_err(|err| state.fail(CREATE_POST_ACTION, err, request))?;
    let session = required_session(&state, CREATE_POST_ACTION, success.session, request)?;
    let post = Post::draft(success.params, &session, state.clock.utc());
    Ok(HttpResponse::Ok().json(CreatePostResponse {
        success: true,
        message: "Post created successfully",
        post,
    }))
}

/// Check registration details without creating an account.
#[utoipa::path(
    post,
    path = "/api/v1/actions/accounts/validate",
    request_body = ValidateAccountRequestSchema,
    responses(
        (status = 200, description = "Details accepted", body = ValidateAccountResponse),
        (status = 400, description = "Invalid details", body = FailureEnvelope),
        (status = 500, description = "Unexpected failure", body = FailureEnvelope)
    ),
    tags = ["actions"],
    operation_id = "validateAccount",
    security([])
)]
#[post("/accounts/validate")]
pub async fn validate_account(
    state: web::Data<HttpState>,
    context: ActionContext,
    payload: web::Json<Value>,
) -> ActionResponse {
    let request = context.request();
    let options = ActionOptions::new(payload.into_inner(), &ACCOUNT_SCHEMA);
    let success = state
        .pipeline
        .run::<AccountInput>(options, request)
        .await
        .map_err(|err| state.fail(VALIDATE_ACCOUNT_ACTION, err, request))?;
    Ok(HttpResponse::Ok().json(ValidateAccountResponse::from(success.params)))
}
