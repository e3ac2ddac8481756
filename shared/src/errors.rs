//! Error types for the Authgate application

use thiserror::Error;

/// Authentication and authorization failures.
///
/// The display text is the client-facing message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please provide email and password")]
    MissingCredentials,

    /// Unknown email and wrong password share this variant
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("You are not logged in! Please log in to get access")]
    NotLoggedIn,

    #[error("Invalid token. Please log in again!")]
    InvalidToken,

    #[error("Your token has expired! Please log in again.")]
    TokenExpired,

    #[error("The user belonging to this token does not exist")]
    UserNoLongerExists,

    #[error("User changed password recently! Please log in again.")]
    PasswordChanged,

    #[error("Your current password is wrong.")]
    WrongCurrentPassword,

    #[error("You do not have permission to perform this action.")]
    InsufficientRole,
}

impl AuthError {
    /// HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingCredentials => 400,
            AuthError::InsufficientRole => 403,
            _ => 401,
        }
    }

    /// Short label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::NotLoggedIn => "not_logged_in",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::UserNoLongerExists => "user_gone",
            AuthError::PasswordChanged => "password_changed",
            AuthError::WrongCurrentPassword => "wrong_current_password",
            AuthError::InsufficientRole => "insufficient_role",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingCredentials.status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::PasswordChanged.status_code(), 401);
        assert_eq!(AuthError::InsufficientRole.status_code(), 403);
    }

    #[test]
    fn test_credentials_message_is_uniform() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Incorrect email or password"
        );
    }
}
