//! Input validation functions
//!
//! Field rules for user accounts, usable both standalone and as
//! `validator` custom functions on the request types.

use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Minimum password length
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum password length
pub const PASSWORD_MAX_LEN: usize = 128;
/// Maximum display name length
pub const NAME_MAX_LEN: usize = 100;

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(rule("name_required", "Please tell us your name!"));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(rule("name_length", "A name must have at most 100 characters"));
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(rule(
            "password_length",
            "Password must be at least 8 characters",
        ));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(rule("password_length", "Password too long"));
    }
    Ok(())
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Flatten validation errors into one message.
///
/// Fields are reported in name order so the message is stable.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let details: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {}", field),
            })
        })
        .collect();

    format!("Invalid input data. {}", details.join(". "))
}
