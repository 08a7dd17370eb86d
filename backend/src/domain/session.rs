//! Authenticated identity as resolved by the identity provider.
//!
//! Sessions are owned by the identity provider. Actions only read them, so
//! the type exposes accessors and no mutators beyond construction.

use std::fmt;

use serde::Serialize;

/// Validation errors raised when constructing a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// The user id was blank once trimmed.
    EmptyUserId,
    /// The email address was blank once trimmed.
    EmptyEmail,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "session user id must not be empty"),
            Self::EmptyEmail => write!(f, "session email must not be empty"),
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// Read-only view of an authenticated caller.
///
/// ## Invariants
/// - `id` and `email` are trimmed and non-empty.
///
/// Serialises as `{"id", "email", "name", "image"}` with absent optional
/// fields rendered as `null`, matching the session payload returned to
/// clients.
///
/// # Examples
/// ```
/// use server_actions::domain::Session;
///
/// let session = Session::try_new("user-1", "ada@example.com")
///     .expect("valid session")
///     .with_name("Ada Lovelace");
/// assert_eq!(session.id(), "user-1");
/// assert_eq!(session.name(), Some("Ada Lovelace"));
/// assert!(session.image().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    id: String,
    email: String,
    name: Option<String>,
    image: Option<String>,
}

impl Session {
    /// Construct a session from the mandatory identity fields.
    pub fn try_new(id: &str, email: &str) -> Result<Self, SessionValidationError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SessionValidationError::EmptyUserId);
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionValidationError::EmptyEmail);
        }
        Ok(Self {
            id: id.to_owned(),
            email: email.to_owned(),
            name: None,
            image: None,
        })
    }

    /// Attach the display name; blank names are ignored.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into());
        self
    }

    /// Attach the avatar URL; blank values are ignored.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = non_blank(image.into());
        self
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Email address of the user.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name, when the provider knows one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Avatar URL, when the provider knows one.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
