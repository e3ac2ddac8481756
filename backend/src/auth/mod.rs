//! Authentication module
//!
//! Provides JWT-based authentication with argon2 password hashing and
//! role-based route restriction.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{
    authorize, bearer_token, protect, require_role, restrict_to, AllowedRoles, AuthUser,
};
pub use password::PasswordService;
