//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::models::user::{validate_language_code, DEFAULT_LANGUAGE_CODE};
use crate::utils::errors::{Result, UserStoreError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Names of the connection settings that are missing.
///
/// Reported together so a single startup attempt lists everything to fix.
pub fn missing_connection_settings(config: &super::DatabaseConfig) -> Vec<&'static str> {
    [
        ("host", &config.host),
        ("user", &config.user),
        ("password", &config.password),
        ("name", &config.name),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect()
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    let missing = missing_connection_settings(config);
    if !missing.is_empty() {
        return Err(UserStoreError::Configuration(format!(
            "Missing database settings: {} (set DB_HOST, DB_USER, DB_PASS and DB_NAME)",
            missing.join(", ")
        )));
    }

    if config.port == 0 {
        return Err(UserStoreError::Configuration(
            "Database port must be greater than 0".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(UserStoreError::Configuration(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(UserStoreError::Configuration(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    if config.acquire_timeout_secs == 0 {
        return Err(UserStoreError::Configuration(
            "Acquire timeout must be greater than 0".to_string(),
        ));
    }

    validate_collation_name(&config.collation)
}

/// Check that `collation` can be spliced into DDL as a quoted identifier.
///
/// Covers ICU (`fa-x-icu`, `und-u-ks-level2`) and libc (`fa_IR.utf8`) names.
pub fn validate_collation_name(collation: &str) -> Result<()> {
    let valid = !collation.is_empty()
        && collation.len() <= 63
        && collation
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));

    if !valid {
        return Err(UserStoreError::Configuration(format!(
            "Invalid collation name: {:?}",
            collation
        )));
    }

    Ok(())
}

/// Validate internationalization configuration
///
/// New users start on `DEFAULT_LANGUAGE_CODE`, so it must stay selectable.
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.supported_languages.is_empty() {
        return Err(UserStoreError::Configuration(
            "At least one supported language is required".to_string(),
        ));
    }

    if !config
        .supported_languages
        .iter()
        .any(|code| code == DEFAULT_LANGUAGE_CODE)
    {
        return Err(UserStoreError::Configuration(format!(
            "Supported languages must include the default language {:?}",
            DEFAULT_LANGUAGE_CODE
        )));
    }

    if let Some(code) = config
        .supported_languages
        .iter()
        .find(|code| validate_language_code(code).is_err())
    {
        return Err(UserStoreError::Configuration(format!(
            "Invalid language code in supported languages: {:?}",
            code
        )));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(UserStoreError::Configuration(
            "Log level is required".to_string(),
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(UserStoreError::Configuration(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
