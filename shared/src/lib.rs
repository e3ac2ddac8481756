//! Authgate Shared Library
//!
//! This crate contains the wire types, user model and input validation
//! shared by the backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Role, UnknownRole, User};
pub use types::*;
