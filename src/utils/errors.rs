//! Error handling for the user store
//!
//! This module defines the error type returned by every repository and service
//! operation. Storage failures never escape as panics; they are logged at the
//! failing operation and handed back to the caller as a `UserStoreError`.

use thiserror::Error;

/// Postgres SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Main error type for user store operations
#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database statement error: {0}")]
    Statement(#[source] sqlx::Error),

    #[error("User already exists: {external_user_id}")]
    AlreadyExists { external_user_id: i64 },

    #[error("User not found: {external_user_id}")]
    UserNotFound { external_user_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for user store operations
pub type Result<T> = std::result::Result<T, UserStoreError>;

impl UserStoreError {
    /// Classify an error raised while executing a statement.
    ///
    /// Pool and transport failures that surface mid-statement are still
    /// reported as connection failures.
    pub fn from_statement(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => UserStoreError::Connection(error),
            other => UserStoreError::Statement(other),
        }
    }

    /// Classify an error raised by an `INSERT` for `external_user_id`.
    pub fn from_insert(error: sqlx::Error, external_user_id: i64) -> Self {
        let unique_violation = error
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);

        if unique_violation {
            UserStoreError::AlreadyExists { external_user_id }
        } else {
            Self::from_statement(error)
        }
    }

    /// Storage could not be reached, or rejected the connection
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, UserStoreError::Connection(_))
    }

    /// A statement reached storage and was rejected there
    pub fn is_statement_failure(&self) -> bool {
        matches!(
            self,
            UserStoreError::Statement(_) | UserStoreError::AlreadyExists { .. }
        )
    }

    /// Get error severity level
    ///
    /// Expected outcomes such as a missing user rank below storage failures.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            UserStoreError::Configuration(_) => ErrorSeverity::Critical,
            UserStoreError::Config(_) => ErrorSeverity::Critical,
            UserStoreError::Connection(_) => ErrorSeverity::Critical,
            UserStoreError::AlreadyExists { .. } => ErrorSeverity::Warning,
            UserStoreError::UserNotFound { .. } => ErrorSeverity::Warning,
            UserStoreError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
