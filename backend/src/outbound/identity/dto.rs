//! DTOs for the identity provider's JSON payloads.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! sessions in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::Session;

/// Body of `GET /api/auth/get-session`; the provider answers `null` for
/// anonymous callers.
#[derive(Debug, Deserialize)]
pub(super) struct SessionEnvelopeDto {
    pub(super) user: SessionUserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionUserDto {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) name: Option<String>,
    pub(super) image: Option<String>,
}

impl SessionEnvelopeDto {
    pub(super) fn into_domain_session(self) -> Result<Session, String> {
        let SessionUserDto {
            id,
            email,
            name,
            image,
        } = self.user;
        let session = Session::try_new(&id, &email)
            .map_err(|err| format!("session user {id:?} is invalid: {err}"))?;
        let session = match name.filter(|name| !name.trim().is_empty()) {
            Some(name) => session.with_name(name),
            None => session,
        };
        Ok(match image.filter(|image| !image.trim().is_empty()) {
            Some(image) => session.with_image(image),
            None => session,
        })
    }
}

/// Body of `POST /api/auth/sign-in/social`.
#[derive(Debug, Serialize)]
pub(super) struct SocialSignInRequestDto<'a> {
    pub(super) provider: &'a str,
}

/// Answer of `POST /api/auth/sign-in/social`.
#[derive(Debug, Deserialize)]
pub(super) struct SocialSignInResponseDto {
    pub(super) url: String,
}
