//! Account form MCP Tools
//!
//! Field checks for the sign-up, sign-in, password reset and change password
//! forms. The first failing field wins.

use tracing::debug;

use crate::validation::{
    email_validation_message, password_validation_message, passwords_match, ValidationOutcome,
    PASSWORDS_DO_NOT_MATCH, PASSWORD_REQUIRED,
};

pub fn validate_email(email: &str) -> ValidationOutcome {
    ValidationOutcome::from_message(email_validation_message(email))
}

pub fn validate_password(password: &str) -> ValidationOutcome {
    ValidationOutcome::from_message(password_validation_message(password))
}

/// Email, then password strength, then confirmation
pub fn validate_sign_up(email: &str, password: &str, confirm_password: &str) -> ValidationOutcome {
    let outcome = first_failure([
        email_validation_message(email),
        password_validation_message(password),
        mismatch(password, confirm_password),
    ]);
    debug!(valid = outcome.is_valid(), "sign-up form checked");
    outcome
}

/// Sign-in only requires a password to be present; strength is checked at sign-up
pub fn validate_sign_in(email: &str, password: &str) -> ValidationOutcome {
    let password_missing = password.is_empty().then_some(PASSWORD_REQUIRED);
    first_failure([email_validation_message(email), password_missing])
}

pub fn validate_password_reset(email: &str) -> ValidationOutcome {
    validate_email(email)
}

pub fn validate_password_change(new_password: &str, confirm_password: &str) -> ValidationOutcome {
    first_failure([
        password_validation_message(new_password),
        mismatch(new_password, confirm_password),
    ])
}

fn mismatch(password: &str, confirm_password: &str) -> Option<&'static str> {
    (!passwords_match(password, confirm_password)).then_some(PASSWORDS_DO_NOT_MATCH)
}

fn first_failure<const N: usize>(checks: [Option<&'static str>; N]) -> ValidationOutcome {
    ValidationOutcome::from_message(checks.into_iter().flatten().next())
}
