//! Database service layer
//!
//! Bundles the pool with the repositories built on it, so process startup has
//! one value to construct and hand out.

use crate::config::DatabaseConfig;
use crate::database::{create_pool, health_check, init_schema, DatabasePool, UserRepository};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    collation: String,
    pub users: UserRepository,
}

impl DatabaseService {
    /// `collation` is applied to text columns by `init_schema`
    pub fn new(pool: DatabasePool, collation: impl Into<String>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            pool,
            collation: collation.into(),
        }
    }

    /// Build the pool for `config` and the repositories on top of it
    pub fn connect(config: &DatabaseConfig) -> Self {
        Self::new(create_pool(config), config.collation.clone())
    }

    /// Verify the server is reachable
    pub async fn health_check(&self) -> Result<()> {
        health_check(&self.pool).await
    }

    /// Create missing types and tables
    pub async fn init_schema(&self) -> Result<()> {
        init_schema(&self.pool, &self.collation).await
    }
}
