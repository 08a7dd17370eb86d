//! Session action handlers.
//!
//! ```text
//! GET  /api/v1/actions/session
//! POST /api/v1/actions/sign-out
//! POST /api/v1/actions/sign-in/google
//! ```
//!
//! These actions talk to the identity provider directly instead of running
//! the action pipeline. Provider failures are still normalised and logged
//! once through the shared reporter.

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use super::context::ActionContext;
use super::envelope::{Acknowledged, FailureEnvelope};
use super::error::ActionResponse;
use super::schemas::SessionUserSchema;
use super::state::HttpState;
use crate::domain::ports::SocialProvider;
use crate::domain::schema::FieldErrors;
use crate::domain::{ActionError, Fault, Session};

/// Action name reported for session lookup failures.
pub const GET_SESSION_ACTION: &str = "getSession";
/// Action name reported for sign-out failures.
pub const SIGN_OUT_ACTION: &str = "signOut";
/// Action name reported for social sign-in failures.
pub const SIGN_IN_ACTION: &str = "signInSocial";
/// Message returned when the provider could not end the session.
pub const SIGN_OUT_FAILED_MESSAGE: &str = "Failed to sign out";

/// Response of the session lookup: `{"user": null}` for anonymous callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(value_type = Option<SessionUserSchema>)]
    user: Option<Session>,
}

/// Return the caller's identity, or `null` when there is none.
///
/// The lookup never fails from the caller's point of view: provider errors
/// are logged and render as an anonymous caller.
#[utoipa::path(
    get,
    path = "/api/v1/actions/session",
    responses(
        (status = 200, description = "Current caller", body = SessionResponse)
    ),
    tags = ["session"],
    operation_id = "getSession",
    security([])
)]
#[get("/session")]
pub async fn get_session(state: web::Data<HttpState>, context: ActionContext) -> HttpResponse {
    let request = context.request();
    let user = match state.identity.get_session(request).await {
        Ok(session) => session,
        Err(err) => {
            state
                .reporter
                .report(GET_SESSION_ACTION, Fault::foreign(err), Some(request));
            None
        }
    };
    HttpResponse::Ok().json(SessionResponse { user })
}

/// End the caller's session.
#[utoipa::path(
    post,
    path = "/api/v1/actions/sign-out",
    responses(
        (status = 200, description = "Signed out", body = Acknowledged),
        (status = 502, description = "Provider failed", body = FailureEnvelope)
    ),
    tags = ["session"],
    operation_id = "signOut",
    security(("SessionCookie" = []))
)]
#[post("/sign-out")]
pub async fn sign_out(state: web::Data<HttpState>, context: ActionContext) -> HttpResponse {
    let request = context.request();
    match state.identity.sign_out(request).await {
        Ok(()) => HttpResponse::Ok().json(Acknowledged::OK),
        Err(err) => {
            state
                .reporter
                .report(SIGN_OUT_ACTION, Fault::foreign(err), Some(request));
            HttpResponse::build(StatusCode::BAD_GATEWAY)
                .json(FailureEnvelope::message(SIGN_OUT_FAILED_MESSAGE))
        }
    }
}

/// Start a social sign-in and redirect the caller to the provider.
#[utoipa::path(
    post,
    path = "/api/v1/actions/sign-in/{provider}",
    params(("provider" = String, Path, description = "Social provider id", example = "google")),
    responses(
        (status = 303, description = "Redirect to the provider", headers(("Location" = String, description = "Provider sign-in URL"))),
        (status = 400, description = "Unknown provider id", body = FailureEnvelope),
        (status = 500, description = "Provider failed", body = FailureEnvelope)
    ),
    tags = ["session"],
    operation_id = "signInSocial",
    security([])
)]
#[post("/sign-in/{provider}")]
pub async fn sign_in_social(
    state: web::Data<HttpState>,
    context: ActionContext,
    provider: web::Path<String>,
) -> ActionResponse {
    let request = context.request();
    let provider = SocialProvider::new(&provider).map_err(|err| {
        let mut errors = FieldErrors::new();
        errors.push_raw("provider", err.to_string());
        state.fail(SIGN_IN_ACTION, errors, request)
    })?;
    let url = state
        .identity
        .start_social_sign_in(&provider)
        .await
        .map_err(|err| {
            state.fail(
                SIGN_IN_ACTION,
                ActionError::unknown(format!("social sign-in failed: {err}")),
                request,
            )
        })?;
    Ok(HttpResponse::SeeOther()
        .insert_header((LOCATION, url.as_str()))
        .finish())
}
