//! User persistence
//!
//! Provides the `UserStore` seam with PostgreSQL and in-memory implementations.

pub mod memory;
pub mod user;

pub use memory::MemoryUserStore;
pub use user::{NewUser, PgUserStore, StoreError, UserRecord, UserStore};
