//! Schema initialization
//!
//! The store owns a single table and its status enum. Both are created on
//! startup when absent, which makes initialization safe to repeat on every
//! process start.

use crate::config::validation::validate_collation_name;
use crate::database::connection::{acquire, DatabasePool};
use crate::utils::errors::{Result, UserStoreError};

/// ICU root collation: locale-aware ordering for every script
pub const DEFAULT_COLLATION: &str = "und-x-icu";

/// `CREATE TYPE` has no `IF NOT EXISTS`, so an existing type is tolerated instead
const CREATE_TERMS_STATUS_TYPE: &str = r#"
DO $$
BEGIN
    CREATE TYPE terms_status AS ENUM ('initial', 'read_rules', 'accepted');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END
$$
"#;

/// DDL for the `users` table, with `language_code` under `collation`
pub fn create_users_table_sql(collation: &str) -> Result<String> {
    validate_collation_name(collation)?;

    Ok(format!(
        r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    external_user_id BIGINT NOT NULL UNIQUE,
    language_code VARCHAR(10) COLLATE "{collation}" NOT NULL DEFAULT 'en',
    terms_status terms_status NOT NULL DEFAULT 'initial',
    accepted_at TIMESTAMPTZ NULL,
    last_bot_message_id INTEGER NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_accepted_at_matches_status
        CHECK ((terms_status = 'accepted') = (accepted_at IS NOT NULL))
)
"#
    ))
}

/// Create the `terms_status` type and the `users` table if they do not exist yet
pub async fn init_schema(pool: &DatabasePool, collation: &str) -> Result<()> {
    tracing::info!(collation = %collation, "Ensuring users table exists...");

    let create_table = create_users_table_sql(collation)?;
    let mut conn = acquire(pool).await?;

    for statement in [CREATE_TERMS_STATUS_TYPE, create_table.as_str()] {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create users table");
                UserStoreError::from_statement(e)
            })?;
    }

    tracing::info!("Users table ready");
    Ok(())
}
