//! Account sign-up checks: the schema and typed input for validating
//! registration details before an account exists.
//!
//! Every constraint uses its default message, so failures read the same way
//! the validator reports them elsewhere.

use std::fmt;

use serde::Deserialize;

use super::schema::{ObjectSchema, Schema};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Schema for account registration details.
#[must_use]
pub fn account_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("email", Schema::string().email())
        .field("password", Schema::string().min_length(MIN_PASSWORD_LENGTH))
        .field("username", Schema::string().min_length(MIN_USERNAME_LENGTH))
}

/// Validated registration details.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccountInput {
    /// Contact address.
    pub email: String,
    /// Plain-text password; never logged or echoed.
    pub password: String,
    /// Public handle.
    pub username: String,
}

impl fmt::Debug for AccountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{LogLevel, MockActionLogger};
    use crate::domain::{ErrorKind, ErrorReporter};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    const SUMMARY: &str =
        "Invalid email, String must contain at least 8 character(s), Username is required";

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("invalid-email", false)]
    #[case("ada@", false)]
    fn email_addresses_are_checked(#[case] email: &str, #[case] valid: bool) {
        let input = json!({ "email": email, "password": "correct horse", "username": "ada" });
        let result = account_schema().validate(&input);
        assert_eq!(result.is_ok(), valid, "{email}");
        if let Err(errors) = result {
            assert_eq!(errors.get("email"), Some(&["Invalid email".to_owned()][..]));
        }
    }

    #[test]
    fn weak_registrations_fail_on_every_field() {
        let errors = account_schema()
            .validate(&json!({ "email": "invalid-email", "password": "123" }))
            .expect_err("invalid");
        assert_eq!(errors.get("email"), Some(&["Invalid email".to_owned()][..]));
        assert_eq!(
            errors.get("password"),
            Some(&["String must contain at least 8 character(s)".to_owned()][..])
        );
        assert_eq!(errors.get("username"), Some(&["Required".to_owned()][..]));
        assert_eq!(errors.summary(), SUMMARY);
    }

    #[test]
    fn reported_registrations_log_the_summary_once() {
        let mut logger = MockActionLogger::new();
        logger
            .expect_log()
            .withf(|level, payload, message| {
                *level == LogLevel::Warn
                    && payload["action"] == "validateAccount"
                    && payload["error"]["fieldErrors"]["username"][0] == "Required"
                    && message.ends_with(SUMMARY)
            })
            .times(1)
            .return_const(());
        let reporter = ErrorReporter::new(Arc::new(logger));
        let errors = account_schema()
            .validate(&json!({ "email": "invalid-email", "password": "123" }))
            .expect_err("invalid");

        let normalized = reporter.report("validateAccount", errors, None);

        assert_eq!(normalized.kind(), ErrorKind::Validation);
        assert_eq!(normalized.message(), SUMMARY);
    }

    #[test]
    fn debug_output_hides_the_password() {
        let input: AccountInput = account_schema()
            .parse(&json!({
                "email": "ada@example.com",
                "password": "correct horse",
                "username": "ada",
            }))
            .expect("valid input");
        let rendered = format!("{input:?}");
        assert!(!rendered.contains("correct horse"));
        assert!(rendered.contains("ada@example.com"));
    }
}
