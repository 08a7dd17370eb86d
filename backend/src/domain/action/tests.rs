//! Tests for the action pipeline.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{IdentityProviderError, MockIdentityProvider};
use crate::domain::schema::Schema;
use crate::domain::{ErrorKind, UNAUTHORIZED_MESSAGE};

#[derive(Debug, Deserialize, PartialEq)]
struct DataInput {
    data: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct PostInput {
    title: String,
    content: String,
}

#[fixture]
fn data_schema() -> ObjectSchema {
    ObjectSchema::new().field(
        "data",
        Schema::string().min_length(1).message("Data is required"),
    )
}

#[fixture]
fn post_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "title",
            Schema::string()
                .min_length(3)
                .message("Title must be at least 3 characters"),
        )
        .field(
            "content",
            Schema::string()
                .min_length(10)
                .message("Content must be at least 10 characters"),
        )
}

fn session() -> Session {
    Session::try_new("user-1", "ada@example.com").expect("valid session")
}

fn pipeline_with(identity: MockIdentityProvider) -> ActionPipeline {
    ActionPipeline::new(AuthorizationGate::new(Arc::new(identity)))
}

fn untouched_identity() -> MockIdentityProvider {
    let mut identity = MockIdentityProvider::new();
    identity.expect_get_session().never();
    identity
}

#[rstest]
#[tokio::test]
async fn blank_data_fails_validation_before_authorisation(data_schema: ObjectSchema) {
    let pipeline = pipeline_with(untouched_identity());
    let options = ActionOptions::new(json!({ "data": "" }), &data_schema).authorized();

    let err = pipeline
        .run::<DataInput>(options, &RequestContext::new())
        .await
        .expect_err("blank data");

    assert_eq!(err.kind(), ErrorKind::Validation);
    let errors = err.field_errors().expect("field errors");
    assert_eq!(errors.get("data"), Some(&["Data is required".to_owned()][..]));
}

#[rstest]
#[tokio::test]
async fn every_invalid_field_is_reported(post_schema: ObjectSchema) {
    let pipeline = pipeline_with(untouched_identity());
    let options = ActionOptions::new(json!({ "title": "Hi", "content": "short" }), &post_schema);

    let err = pipeline
        .run::<PostInput>(options, &RequestContext::new())
        .await
        .expect_err("short fields");

    let errors = err.field_errors().expect("field errors");
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec!["content", "title"]
    );
    assert_eq!(
        errors.get("title"),
        Some(&["Title must be at least 3 characters".to_owned()][..])
    );
    assert_eq!(
        errors.get("content"),
        Some(&["Content must be at least 10 characters".to_owned()][..])
    );
}

#[rstest]
#[case(Ok(None))]
#[case(Err(IdentityProviderError::timeout("deadline elapsed")))]
#[tokio::test]
async fn protected_actions_without_a_session_are_unauthorised(
    data_schema: ObjectSchema,
    #[case] lookup: Result<Option<Session>, IdentityProviderError>,
) {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_session()
        .times(1)
        .return_once(move |_| lookup);
    let pipeline = pipeline_with(identity);
    let options = ActionOptions::new(json!({ "data": "hello" }), &data_schema).authorized();

    let err = pipeline
        .run::<DataInput>(options, &RequestContext::new())
        .await
        .expect_err("no session");

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.message(), UNAUTHORIZED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn public_actions_return_typed_params_without_a_lookup(data_schema: ObjectSchema) {
    let pipeline = pipeline_with(untouched_identity());
    let options = ActionOptions::new(json!({ "data": "hello", "extra": 1 }), &data_schema);

    let success = pipeline
        .run::<DataInput>(options, &RequestContext::new())
        .await
        .expect("valid public input");

    assert_eq!(
        success,
        ActionSuccess {
            params: DataInput {
                data: "hello".to_owned()
            },
            session: None,
        }
    );
}

#[rstest]
#[tokio::test]
async fn valid_input_is_returned_unchanged(data_schema: ObjectSchema) {
    let pipeline = pipeline_with(untouched_identity());
    let input = json!({ "data": "hello", "extra": 1, "nested": { "kept": true } });
    let options = ActionOptions::new(input.clone(), &data_schema);

    let success = pipeline
        .run::<Value>(options, &RequestContext::new())
        .await
        .expect("valid public input");

    assert_eq!(success.params, input);
}

#[rstest]
#[tokio::test]
async fn protected_actions_carry_the_session(data_schema: ObjectSchema) {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_session()
        .times(1)
        .return_once(|_| Ok(Some(session())));
    let pipeline = pipeline_with(identity);
    let options = ActionOptions::new(json!({ "data": "hello" }), &data_schema).authorized();

    let success = pipeline
        .run::<DataInput>(options, &RequestContext::new())
        .await
        .expect("authorised");

    assert_eq!(success.session, Some(session()));
}

#[rstest]
#[tokio::test]
async fn repeated_runs_fail_identically(post_schema: ObjectSchema) {
    let pipeline = pipeline_with(untouched_identity());
    let input = json!({ "title": "", "content": 7 });

    let first = pipeline
        .run::<PostInput>(ActionOptions::new(input.clone(), &post_schema), &RequestContext::new())
        .await;
    let second = pipeline
        .run::<PostInput>(ActionOptions::new(input, &post_schema), &RequestContext::new())
        .await;

    assert_eq!(first.expect_err("invalid"), second.expect_err("invalid"));
}

#[rstest]
#[tokio::test]
async fn decode_failures_are_unknown(data_schema: ObjectSchema) {
    #[derive(Debug, Deserialize)]
    #[expect(dead_code, reason = "only decoding is exercised")]
    struct WrongShape {
        data: u32,
    }

    let pipeline = pipeline_with(untouched_identity());
    let err = pipeline
        .run::<WrongShape>(
            ActionOptions::new(json!({ "data": "hello" }), &data_schema),
            &RequestContext::new(),
        )
        .await
        .expect_err("decode failure");

    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert_eq!(err.message(), SCHEMA_VALIDATION_FAILED_MESSAGE);
}

#[rstest]
#[case(PipelineStage::Validating, StageOutcome::Passed, true, PipelineStage::Authorizing)]
#[case(PipelineStage::Validating, StageOutcome::Passed, false, PipelineStage::Success)]
#[case(PipelineStage::Validating, StageOutcome::Rejected, true, PipelineStage::Failed)]
#[case(PipelineStage::Authorizing, StageOutcome::Passed, true, PipelineStage::Success)]
#[case(PipelineStage::Authorizing, StageOutcome::Rejected, true, PipelineStage::Failed)]
#[case(PipelineStage::Success, StageOutcome::Rejected, true, PipelineStage::Success)]
#[case(PipelineStage::Failed, StageOutcome::Passed, false, PipelineStage::Failed)]
fn stages_advance_as_documented(
    #[case] from: PipelineStage,
    #[case] outcome: StageOutcome,
    #[case] authorize: bool,
    #[case] expected: PipelineStage,
) {
    let next = from.next(outcome, authorize);
    assert_eq!(next, expected);
    assert_eq!(
        next.is_terminal(),
        matches!(expected, PipelineStage::Success | PipelineStage::Failed)
    );
}

#[test]
fn options_default_to_public() {
    let schema = ObjectSchema::new();
    let options = ActionOptions::new(Value::Null, &schema);
    assert!(!options.authorize);
    assert!(options.authorized().authorize);
}
