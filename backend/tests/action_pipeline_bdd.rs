//! Behaviour tests for the action pipeline behind the HTTP adapter.
//!
//! These scenarios drive the post actions end to end and confirm that
//! validation runs before the session lookup, that every failure is logged
//! once with the response's trace id, and that successful actions see the
//! caller's session.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

#[path = "support/doubles.rs"]
mod doubles;

use std::cell::RefCell;
use std::sync::Arc;

use actix_rt::{System, SystemRunner};
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use doubles::{RecordingActionLogger, RecordingIdentityProvider, SessionAnswer};
use mockable::MockClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use server_actions::Trace;
use server_actions::domain::ports::LogLevel;
use server_actions::domain::{Session, TRACE_ID_HEADER};
use server_actions::inbound::http::configure_actions;
use server_actions::inbound::http::state::{HttpState, HttpStatePorts};

const SESSION_USER_ID: &str = "user-7";

struct Response {
    status: u16,
    trace_id: Option<String>,
    body: Value,
}

struct ActionWorld {
    runner: SystemRunner,
    identity: RecordingIdentityProvider,
    logger: RecordingActionLogger,
    response: RefCell<Option<Response>>,
}

impl ActionWorld {
    fn new() -> Self {
        Self {
            runner: System::new(),
            identity: RecordingIdentityProvider::new(SessionAnswer::Anonymous),
            logger: RecordingActionLogger::default(),
            response: RefCell::new(None),
        }
    }

    fn state(&self) -> web::Data<HttpState> {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        );
        web::Data::new(HttpState::new(HttpStatePorts {
            identity: Arc::new(self.identity.clone()),
            logger: Arc::new(self.logger.clone()),
            clock: Arc::new(clock),
        }))
    }

    fn post(&self, path: &str, body: Value) {
        let state = self.state();
        let response = self.runner.block_on(async move {
            let app = actix_test::init_service(
                App::new()
                    .app_data(state)
                    .wrap(Trace)
                    .configure(configure_actions),
            )
            .await;
            let request = actix_test::TestRequest::post()
                .uri(&format!("/api/v1/actions{path}"))
                .set_json(body)
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body: Value = actix_test::read_body_json(response).await;
            Response {
                status,
                trace_id,
                body,
            }
        });
        *self.response.borrow_mut() = Some(response);
    }

    fn with_response<F>(&self, f: F)
    where
        F: FnOnce(&Response),
    {
        let response = self.response.borrow();
        f(response.as_ref().expect("a request was made"));
    }
}

#[fixture]
fn world() -> ActionWorld {
    ActionWorld::new()
}

#[given("an identity provider with an active session")]
fn an_identity_provider_with_an_active_session(world: &ActionWorld) {
    let session = Session::try_new(SESSION_USER_ID, "lin@example.com")
        .expect("valid session")
        .with_name("Lin");
    world.identity.set_answer(SessionAnswer::Active(session));
}

#[given("an identity provider without a session")]
fn an_identity_provider_without_a_session(world: &ActionWorld) {
    world.identity.set_answer(SessionAnswer::Anonymous);
}

#[given("an identity provider that is unavailable")]
fn an_identity_provider_that_is_unavailable(world: &ActionWorld) {
    world
        .identity
        .set_answer(SessionAnswer::Unavailable("connection reset".to_owned()));
}

#[when("the client creates a post titled {title}")]
fn the_client_creates_a_post_titled(world: &ActionWorld, title: String) {
    world.post(
        "/posts",
        json!({ "title": title, "content": "Long enough content body" }),
    );
}

#[when("the client submits public data {data}")]
fn the_client_submits_public_data(world: &ActionWorld, data: String) {
    world.post("/posts/public", json!({ "data": data }));
}

#[then("the response is a validation failure for {field}")]
fn the_response_is_a_validation_failure_for(world: &ActionWorld, field: String) {
    world.with_response(|response| {
        assert_eq!(response.status, 400);
        assert_eq!(response.body["success"], json!(false));
        assert!(
            response.body["fieldErrors"][field.as_str()].is_array(),
            "expected field errors for {field}: {}",
            response.body
        );
    });
}

#[then("the response is unauthorised")]
fn the_response_is_unauthorised(world: &ActionWorld) {
    world.with_response(|response| {
        assert_eq!(response.status, 401);
        assert_eq!(
            response.body,
            json!({ "success": false, "error": "User Unauthorized" })
        );
    });
}

#[then("the post is authored by the session user")]
fn the_post_is_authored_by_the_session_user(world: &ActionWorld) {
    world.with_response(|response| {
        assert_eq!(response.status, 200);
        assert_eq!(response.body["post"]["authorId"], json!(SESSION_USER_ID));
        assert_eq!(
            response.body["post"]["createdAt"],
            json!("2026-03-01T09:00:00Z")
        );
    });
}

#[then("the post is unpublished")]
fn the_post_is_unpublished(world: &ActionWorld) {
    world.with_response(|response| {
        assert_eq!(response.body["post"]["published"], json!(false));
    });
}

#[then("the response echoes the public data {data}")]
fn the_response_echoes_the_public_data(world: &ActionWorld, data: String) {
    world.with_response(|response| {
        assert_eq!(response.status, 200);
        assert_eq!(response.body["receivedData"], json!({ "data": data }));
    });
}

#[then("the identity provider was not consulted")]
fn the_identity_provider_was_not_consulted(world: &ActionWorld) {
    assert_eq!(world.identity.lookups(), 0);
}

#[then("one warning was logged with the response trace id")]
fn one_warning_was_logged_with_the_response_trace_id(world: &ActionWorld) {
    let records = world.logger.records();
    assert_eq!(records.len(), 1, "expected exactly one log record");
    let record = records.first().expect("one record");
    assert_eq!(record.level, LogLevel::Warn);
    assert!(record.message.starts_with("createPost failed"));
    world.with_response(|response| {
        let trace_id = response.trace_id.as_deref().expect("trace id header");
        assert_eq!(record.payload["traceId"], json!(trace_id));
    });
}

#[then("nothing was logged")]
fn nothing_was_logged(world: &ActionWorld) {
    assert!(world.logger.records().is_empty());
}

#[scenario(
    path = "tests/features/action_pipeline.feature",
    name = "Invalid input is rejected before the session lookup"
)]
fn invalid_input_is_rejected_before_the_session_lookup(world: ActionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/action_pipeline.feature",
    name = "Anonymous callers cannot create posts"
)]
fn anonymous_callers_cannot_create_posts(world: ActionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/action_pipeline.feature",
    name = "Provider outages read as unauthorised"
)]
fn provider_outages_read_as_unauthorised(world: ActionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/action_pipeline.feature",
    name = "Authenticated callers create posts with defaults"
)]
fn authenticated_callers_create_posts_with_defaults(world: ActionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/action_pipeline.feature",
    name = "Public actions skip the session lookup"
)]
fn public_actions_skip_the_session_lookup(world: ActionWorld) {
    drop(world);
}
