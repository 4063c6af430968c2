//! Field-level validation for the auth forms. Every rule here runs before
//! any request leaves the process, and each failure names the offending
//! field with the message the screen shows verbatim.

use crate::errors::ValidationError;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Normalize an email for submission and draft storage.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Normalize and validate an email, or fail with the screen's message.
pub(crate) fn require_email(email: &str) -> Result<String, ValidationError> {
    let normalized = normalize_email(email);
    if normalized.is_empty() {
        return Err(ValidationError::new("email", "Email is required"));
    }
    if !valid_email(&normalized) {
        return Err(ValidationError::new("email", "Email is invalid"));
    }
    Ok(normalized)
}

/// Require a non-blank name part (first or last name).
pub(crate) fn require_name(
    field: &'static str,
    value: &str,
    message: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(trimmed.to_string())
}

/// Require a password of at least [`MIN_PASSWORD_CHARS`] characters.
pub(crate) fn require_password(
    field: &'static str,
    password: &SecretString,
    message: &str,
) -> Result<(), ValidationError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

/// Require the confirmation to match the password exactly.
pub(crate) fn require_match(
    password: &SecretString,
    confirm: &SecretString,
) -> Result<(), ValidationError> {
    if password.expose_secret() != confirm.expose_secret() {
        return Err(ValidationError::new(
            "confirmPassword",
            "Passwords don't match",
        ));
    }
    Ok(())
}
