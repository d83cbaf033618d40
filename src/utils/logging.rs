//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the user store.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{ErrorSeverity, Result, UserStoreError};

/// Initialize logging based on configuration
///
/// `RUST_LOG` takes precedence over the configured level. When a log directory
/// is configured, the returned guard must be kept alive to flush the file.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "bot-user-store.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| UserStoreError::Configuration(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of one repository operation.
///
/// Failures are logged once, at a level taken from the error's severity, so an
/// expected miss such as an unknown user shows up as a warning.
pub fn log_database_operation(
    operation: &str,
    table: &str,
    external_user_id: i64,
    duration_ms: u64,
    error: Option<&UserStoreError>,
) {
    let Some(error) = error else {
        debug!(
            operation = operation,
            table = table,
            external_user_id = external_user_id,
            duration_ms = duration_ms,
            "Database operation completed"
        );
        return;
    };

    match error.severity() {
        ErrorSeverity::Info => info!(
            operation = operation,
            table = table,
            external_user_id = external_user_id,
            duration_ms = duration_ms,
            error = %error,
            "Database operation rejected"
        ),
        ErrorSeverity::Warning => warn!(
            operation = operation,
            table = table,
            external_user_id = external_user_id,
            duration_ms = duration_ms,
            error = %error,
            "Database operation rejected"
        ),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(
            operation = operation,
            table = table,
            external_user_id = external_user_id,
            duration_ms = duration_ms,
            error = %error,
            "Database operation failed"
        ),
    }
}
