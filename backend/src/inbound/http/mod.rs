//! HTTP inbound adapter exposing server actions as REST endpoints.

pub mod actions;
pub mod context;
pub mod envelope;
pub mod error;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::{ActionFailure, ActionResponse};

/// Path prefix shared by every action endpoint.
pub const ACTIONS_SCOPE: &str = "/api/v1/actions";

/// Register every action handler under [`ACTIONS_SCOPE`].
///
/// Handler state must be registered separately as `web::Data<HttpState>`.
pub fn configure_actions(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(ACTIONS_SCOPE)
            .app_data(error::json_config())
            .service(actions::public_post)
            .service(actions::protected_post)
            .service(actions::create_post)
            .service(actions::validate_account)
            .service(session::get_session)
            .service(session::sign_out)
            .service(session::sign_in_social),
    );
}
