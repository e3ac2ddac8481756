//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the user store, password hashing and token issuance.

pub mod user;

pub use user::{IssuedToken, UserService};
