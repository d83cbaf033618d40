//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::{Deserialize, Serialize};

use crate::database::schema::DEFAULT_COLLATION;
use crate::models::user::DEFAULT_LANGUAGE_CODE;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "BOT_USER_STORE_CONFIG";

/// Prefix for nested environment overrides, e.g. `BOT_USER_STORE__LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "BOT_USER_STORE";

/// Plain connection variables, mapped onto `database.*`
const DATABASE_ENV_VARS: [(&str, &str); 5] = [
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASS", "database.password"),
    ("DB_NAME", "database.name"),
];

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub i18n: I18nConfig,
}

/// Database configuration
///
/// Connection parameters default to empty strings so that a missing value is
/// reported by validation rather than by a deserialization failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Collation applied to text columns when the table is created
    pub collation: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub directory: Option<String>,
}

/// Internationalization configuration
///
/// New users always start on `DEFAULT_LANGUAGE_CODE`; this only governs which
/// languages they may switch to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub supported_languages: Vec<String>,
}

impl Settings {
    /// Load settings from the default sources.
    ///
    /// Reads `config.toml` from the working directory (or the file named by
    /// `BOT_USER_STORE_CONFIG`) when present, then environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from(Some(Path::new(&path))),
            Err(_) => Self::load_from(None),
        }
    }

    /// Load settings using `path` as the configuration file
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("config").required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        for (var, key) in DATABASE_ENV_VARS {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Settings::default();

        config::Config::builder()
            .set_default("database.port", i64::from(defaults.database.port))?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default(
                "database.min_connections",
                i64::from(defaults.database.min_connections),
            )?
            .set_default(
                "database.acquire_timeout_secs",
                defaults.database.acquire_timeout_secs as i64,
            )?
            .set_default("database.collation", defaults.database.collation)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            .set_default("i18n.supported_languages", defaults.i18n.supported_languages)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::utils::errors::Result<()> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: String::new(),
                port: 5432,
                user: String::new(),
                password: String::new(),
                name: String::new(),
                max_connections: 5,
                min_connections: 0,
                acquire_timeout_secs: 5,
                collation: DEFAULT_COLLATION.to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
                directory: None,
            },
            i18n: I18nConfig {
                supported_languages: vec![DEFAULT_LANGUAGE_CODE.to_string()],
            },
        }
    }
}
