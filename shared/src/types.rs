//! API request and response types

use crate::models::User;
use crate::validation::{validate_name, validate_password};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Envelope status for successful responses
pub const STATUS_SUCCESS: &str = "success";

/// Sign-up request.
///
/// Missing fields deserialize as empty and fail validation. Any `role` sent
/// by the client is ignored; new accounts always start as [`crate::Role::User`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignUpRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[serde(alias = "passwordConfirm")]
    #[validate(must_match(other = "password", message = "Passwords are not the same!"))]
    pub password_confirm: String,
}

/// Login request
///
/// Both fields are optional so a missing field is reported as a 400 by the
/// login handler instead of a body deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Password change request for the current user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdatePasswordRequest {
    #[serde(alias = "passwordCurrent")]
    pub password_current: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[serde(alias = "passwordConfirm")]
    #[validate(must_match(other = "password", message = "Passwords are not the same!"))]
    pub password_confirm: String,
}

/// `data` payload carrying one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user: User,
}

/// `data` payload carrying a user list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersData {
    pub users: Vec<User>,
}

/// Token response (`signup`, `login`, password update)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<UserData>,
}

impl AuthResponse {
    pub fn new(token: String, user: Option<User>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            token,
            data: user.map(|user| UserData { user }),
        }
    }
}

/// Single user response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub status: String,
    pub data: UserData,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data: UserData { user },
        }
    }
}

/// User list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub status: String,
    pub results: usize,
    pub data: UsersData,
}

impl From<Vec<User>> for UsersResponse {
    fn from(users: Vec<User>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            results: users.len(),
            data: UsersData { users },
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `fail` for client errors, `error` for server errors
    pub status: String,
    pub message: String,
}
