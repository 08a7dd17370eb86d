//! Reqwest-backed identity provider adapter.
//!
//! This adapter owns transport details only: header forwarding, timeout and
//! HTTP error mapping, and JSON decoding into domain sessions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, COOKIE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::debug;

use super::dto::{SessionEnvelopeDto, SocialSignInRequestDto, SocialSignInResponseDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, SocialProvider};
use crate::domain::{RequestContext, Session, TRACE_ID_HEADER};

const GET_SESSION_PATH: &str = "api/auth/get-session";
const SIGN_OUT_PATH: &str = "api/auth/sign-out";
const SOCIAL_SIGN_IN_PATH: &str = "api/auth/sign-in/social";
const FORWARDED_HEADERS: [reqwest::header::HeaderName; 2] = [COOKIE, AUTHORIZATION];

/// Identity provider adapter talking to a better-auth compatible service.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: Url,
}

impl HttpIdentityProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let provider = HttpIdentityProvider::new(base_url, Duration::from_secs(5));
    /// assert!(provider.is_ok() || provider.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityProviderError> {
        self.base_url.join(path).map_err(|error| {
            IdentityProviderError::invalid_request(format!("invalid endpoint {path}: {error}"))
        })
    }

    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), IdentityProviderError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Copy credentials and the trace id of the caller onto `request`.
fn forward_context(mut request: RequestBuilder, context: &RequestContext) -> RequestBuilder {
    for name in &FORWARDED_HEADERS {
        if let Some(value) = context.header(name.as_str()) {
            request = request.header(name.clone(), value);
        }
    }
    if let Some(trace_id) = context.trace_id() {
        request = request.header(TRACE_ID_HEADER, trace_id.to_string());
    }
    request
}

impl HttpIdentityProvider {
    async fn lookup_session(
        &self,
        context: &RequestContext,
    ) -> Result<Option<Session>, IdentityProviderError> {
        let request = forward_context(self.client.get(self.endpoint(GET_SESSION_PATH)?), context);
        let (status, body) = self.send(request).await?;
        if status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_session(&body)
    }

    async fn end_session(&self, context: &RequestContext) -> Result<(), IdentityProviderError> {
        let request = forward_context(self.client.post(self.endpoint(SIGN_OUT_PATH)?), context)
            .json(&serde_json::json!({}));
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(())
    }

    async fn social_sign_in_url(
        &self,
        provider: &SocialProvider,
    ) -> Result<Url, IdentityProviderError> {
        let request = self
            .client
            .post(self.endpoint(SOCIAL_SIGN_IN_PATH)?)
            .json(&SocialSignInRequestDto {
                provider: provider.as_ref(),
            });
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_sign_in_url(&body)
    }
}

/// Emit a debug event for failed provider calls.
///
/// Callers report the failure themselves; this only records which
/// operation failed and how.
fn traced<T>(
    operation: &'static str,
    result: Result<T, IdentityProviderError>,
) -> Result<T, IdentityProviderError> {
    if let Err(error) = &result {
        debug!(operation, code = error.code(), %error, "identity provider call failed");
    }
    result
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn get_session(
        &self,
        context: &RequestContext,
    ) -> Result<Option<Session>, IdentityProviderError> {
        traced("get_session", self.lookup_session(context).await)
    }

    async fn sign_out(&self, context: &RequestContext) -> Result<(), IdentityProviderError> {
        traced("sign_out", self.end_session(context).await)
    }

    async fn start_social_sign_in(
        &self,
        provider: &SocialProvider,
    ) -> Result<Url, IdentityProviderError> {
        traced("start_social_sign_in", self.social_sign_in_url(provider).await)
    }
}

fn parse_session(body: &[u8]) -> Result<Option<Session>, IdentityProviderError> {
    let decoded: Option<SessionEnvelopeDto> = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid session JSON payload: {error}"))
    })?;
    decoded
        .map(SessionEnvelopeDto::into_domain_session)
        .transpose()
        .map_err(IdentityProviderError::decode)
}

fn parse_sign_in_url(body: &[u8]) -> Result<Url, IdentityProviderError> {
    let decoded: SocialSignInResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid sign-in JSON payload: {error}"))
    })?;
    Url::parse(&decoded.url).map_err(|error| {
        IdentityProviderError::decode(format!("invalid sign-in URL {:?}: {error}", decoded.url))
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout(error.to_string())
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityProviderError::timeout(format!("status {}", status.as_u16()))
        }
        _ => IdentityProviderError::rejected(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network identity mapping helpers.

    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    use crate::domain::TraceId;

    #[test]
    fn null_session_bodies_are_anonymous() {
        assert_eq!(parse_session(b"null").expect("decodes"), None);
    }

    #[test]
    fn decodes_session_users() {
        let body = br#"{
            "session": { "id": "sess-1", "expiresAt": "2026-03-01T00:00:00.000Z" },
            "user": {
                "id": "user-1",
                "email": "ada@example.com",
                "name": "Ada Lovelace",
                "image": null,
                "emailVerified": true
            }
        }"#;

        let session = parse_session(body)
            .expect("decodes")
            .expect("session present");
        assert_eq!(session.id(), "user-1");
        assert_eq!(session.name(), Some("Ada Lovelace"));
        assert!(session.image().is_none());
    }

    #[rstest]
    #[case::not_json(b"<html>".as_slice())]
    #[case::missing_user(br#"{"session":{}}"#.as_slice())]
    #[case::blank_email(br#"{"user":{"id":"user-1","email":""}}"#.as_slice())]
    fn malformed_sessions_are_decode_errors(#[case] body: &[u8]) {
        let error = parse_session(body).expect_err("decode should fail");
        assert!(
            matches!(error, IdentityProviderError::Decode { .. }),
            "unexpected error {error:?}"
        );
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::forbidden(StatusCode::FORBIDDEN, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] is_timeout: bool,
    ) {
        let error = map_status_error(status, b"{\"message\":\"nope\"}");
        if is_timeout {
            assert!(matches!(error, IdentityProviderError::Timeout { .. }));
        } else {
            assert!(
                matches!(error, IdentityProviderError::Rejected { status: code, .. } if code == status.as_u16())
            );
        }
    }

    #[test]
    fn sign_in_urls_must_be_absolute() {
        let error = parse_sign_in_url(br#"{"url":"/relative","redirect":true}"#)
            .expect_err("relative URL should fail");
        assert!(matches!(error, IdentityProviderError::Decode { .. }));
        let url = parse_sign_in_url(br#"{"url":"https://accounts.google.com/o/oauth2"}"#)
            .expect("absolute URL");
        assert_eq!(url.host_str(), Some("accounts.google.com"));
    }

    #[test]
    fn base_urls_gain_a_trailing_slash() {
        let base = with_trailing_slash(Url::parse("http://auth.local/tenant").expect("url"));
        assert_eq!(
            base.join(GET_SESSION_PATH).expect("join").as_str(),
            "http://auth.local/tenant/api/auth/get-session"
        );
    }

    #[test]
    fn forwards_credentials_and_trace_id() {
        let trace_id = TraceId::from_uuid(Uuid::nil());
        let context = RequestContext::new()
            .with_header("cookie", "better-auth.session_token=abc")
            .with_header("authorization", "Bearer t")
            .with_header("x-unrelated", "dropped")
            .with_trace_id(trace_id);
        let request = forward_context(Client::new().get("http://auth.local/"), &context)
            .build()
            .expect("request builds");

        let headers = request.headers();
        assert_eq!(
            headers.get(COOKIE).and_then(|v| v.to_str().ok()),
            Some("better-auth.session_token=abc")
        );
        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer t")
        );
        assert!(headers.get("x-unrelated").is_none());
        assert_eq!(
            headers.get(TRACE_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some("00000000-0000-0000-0000-000000000000")
        );
    }
}
