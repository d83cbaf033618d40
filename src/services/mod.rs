//! Services module
//!
//! Business logic that bot handlers call into, layered over the repositories.

pub mod user;

pub use user::UserService;
