//! Data models module
//!
//! This module contains the data structures persisted by the user store

pub mod user;

// Re-export commonly used models
pub use user::{TermsStatus, UserRecord, DEFAULT_LANGUAGE_CODE};
