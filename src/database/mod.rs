//! Database module
//!
//! This module handles database connections, schema setup and repositories

pub mod connection;
pub mod repositories;
pub mod schema;
pub mod service;

// Re-export commonly used database components
pub use connection::{acquire, connect_options, create_pool, health_check, DatabasePool};
pub use repositories::UserRepository;
pub use schema::init_schema;
pub use service::DatabaseService;
