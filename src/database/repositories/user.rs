//! User repository implementation
//!
//! Every operation acquires its own pooled connection, runs one statement and
//! hands the connection back when the guard drops, whichever way it returns.

use std::time::Instant;

use sqlx::postgres::PgQueryResult;

use crate::database::connection::{acquire, DatabasePool};
use crate::models::user::{validate_language_code, TermsStatus, UserRecord};
use crate::utils::errors::{Result, UserStoreError};
use crate::utils::logging::log_database_operation;

const USER_COLUMNS: &str = "id, external_user_id, language_code, terms_status, accepted_at, last_bot_message_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: DatabasePool,
}

impl UserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Find user by external (platform) user ID
    ///
    /// Returns `Ok(None)` when no row matches.
    pub async fn find_by_external_id(&self, external_user_id: i64) -> Result<Option<UserRecord>> {
        let started = Instant::now();
        let mut conn = acquire(&self.pool).await?;

        let result = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_user_id = $1"
        ))
        .bind(external_user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(UserStoreError::from_statement);

        finish("find_by_external_id", external_user_id, started, result)
    }

    /// Create a new user with default settings
    ///
    /// Fails with `AlreadyExists` when the external ID is already stored.
    pub async fn create(&self, external_user_id: i64) -> Result<UserRecord> {
        let started = Instant::now();
        let mut conn = acquire(&self.pool).await?;

        let result = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (external_user_id) VALUES ($1) RETURNING {USER_COLUMNS}"
        ))
        .bind(external_user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| UserStoreError::from_insert(e, external_user_id));

        finish("create", external_user_id, started, result)
    }

    /// Update user language
    pub async fn update_language(&self, external_user_id: i64, language_code: &str) -> Result<()> {
        validate_language_code(language_code)?;

        let started = Instant::now();
        let mut conn = acquire(&self.pool).await?;

        let result = sqlx::query(
            "UPDATE users SET language_code = $2, updated_at = NOW() WHERE external_user_id = $1",
        )
        .bind(external_user_id)
        .bind(language_code)
        .execute(&mut *conn)
        .await;

        finish_update("update_language", external_user_id, started, result)
    }

    /// Update terms status
    ///
    /// `accepted_at` is written in the same statement as the status: set to the
    /// update time for `Accepted`, cleared for every other status. `NOW()` is
    /// fixed for the statement, so `accepted_at` and `updated_at` agree.
    pub async fn update_terms_status(&self, external_user_id: i64, status: TermsStatus) -> Result<()> {
        let started = Instant::now();
        let mut conn = acquire(&self.pool).await?;

        let query = match status {
            TermsStatus::Accepted => sqlx::query(
                "UPDATE users SET terms_status = $2, accepted_at = NOW(), updated_at = NOW() WHERE external_user_id = $1",
            ),
            TermsStatus::Initial | TermsStatus::ReadRules => sqlx::query(
                "UPDATE users SET terms_status = $2, accepted_at = NULL, updated_at = NOW() WHERE external_user_id = $1",
            ),
        };

        let result = query
            .bind(external_user_id)
            .bind(status)
            .execute(&mut *conn)
            .await;

        finish_update("update_terms_status", external_user_id, started, result)
    }

    /// Update the ID of the last message the bot sent to the user
    pub async fn update_last_bot_message_id(&self, external_user_id: i64, message_id: i32) -> Result<()> {
        let started = Instant::now();
        let mut conn = acquire(&self.pool).await?;

        let result = sqlx::query(
            "UPDATE users SET last_bot_message_id = $2, updated_at = NOW() WHERE external_user_id = $1",
        )
        .bind(external_user_id)
        .bind(message_id)
        .execute(&mut *conn)
        .await;

        finish_update("update_last_bot_message_id", external_user_id, started, result)
    }
}

/// Log the outcome of `operation` and pass the result through
fn finish<T>(
    operation: &str,
    external_user_id: i64,
    started: Instant,
    result: Result<T>,
) -> Result<T> {
    let duration_ms = started.elapsed().as_millis() as u64;
    log_database_operation(
        operation,
        "users",
        external_user_id,
        duration_ms,
        result.as_ref().err(),
    );

    result
}

/// Like `finish`, treating an update that touched no row as `UserNotFound`
fn finish_update(
    operation: &str,
    external_user_id: i64,
    started: Instant,
    result: std::result::Result<PgQueryResult, sqlx::Error>,
) -> Result<()> {
    let result = match result {
        Ok(done) if done.rows_affected() == 0 => {
            Err(UserStoreError::UserNotFound { external_user_id })
        }
        Ok(_) => Ok(()),
        Err(e) => Err(UserStoreError::from_statement(e)),
    };

    finish(operation, external_user_id, started, result)
}
