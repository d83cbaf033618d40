//! Bot user store
//!
//! Per-user state for a Telegram bot, persisted in PostgreSQL: the platform user
//! ID, a language preference, terms-of-service acceptance with its timestamp,
//! and the ID of the last message the bot sent to the user.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, UserStoreError};

// Re-export main components for easy access
pub use database::{DatabaseService, UserRepository};
pub use models::{TermsStatus, UserRecord};
pub use services::UserService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
