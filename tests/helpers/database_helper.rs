//! Test database helper utilities
//!
//! Tests run against `TEST_DATABASE_URL` when it is set, otherwise against a
//! PostgreSQL container started with testcontainers. Without either, the
//! database tests fail.

use std::sync::Once;

use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres as PostgresImage;

use bot_user_store::config::I18nConfig;
use bot_user_store::database::schema::DEFAULT_COLLATION;
use bot_user_store::database::{init_schema, DatabaseService};
use bot_user_store::{UserRepository, UserService};

static INIT: Once = Once::new();

/// Debian-based image; its server is built with ICU collations
const POSTGRES_TAG: &str = "16";

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    /// Create a test database with a freshly built, empty `users` table
    pub async fn new() -> Self {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt::try_init();
        });

        // For CI/CD environments, use environment variable if available
        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let (url, container) = start_container().await;
                (url, Some(container))
            }
        };

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        // Rebuilt rather than emptied so schema changes always apply.
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&pool)
            .await
            .expect("Failed to drop users table");
        init_schema(&pool, DEFAULT_COLLATION)
            .await
            .expect("Failed to create users table");

        Self {
            pool,
            database_url,
            _container: container,
        }
    }

    pub fn database_service(&self) -> DatabaseService {
        DatabaseService::new(self.pool.clone(), DEFAULT_COLLATION)
    }

    pub fn user_repository(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn user_service(&self, supported_languages: &[&str]) -> UserService {
        let i18n = I18nConfig {
            supported_languages: supported_languages.iter().map(|s| s.to_string()).collect(),
        };
        UserService::new(self.user_repository(), i18n)
    }

    /// Count records in a table
    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
    }

    /// Collation of a column, `None` when it uses the database default
    pub async fn column_collation(&self, table: &str, column: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT collation_name::text FROM information_schema.columns WHERE table_name = $1 AND column_name = $2",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&self.pool)
        .await
    }

    /// Current time on the database server
    pub async fn server_now(&self) -> Result<chrono::DateTime<chrono::Utc>, sqlx::Error> {
        sqlx::query_scalar("SELECT NOW()").fetch_one(&self.pool).await
    }
}

async fn start_container() -> (String, ContainerAsync<PostgresImage>) {
    let container = PostgresImage::default()
        .with_db_name("test_bot_users")
        .with_user("test_user")
        .with_password("test_password")
        .with_tag(POSTGRES_TAG)
        .start()
        .await
        .expect("Failed to start postgres container (set TEST_DATABASE_URL or start Docker)");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");

    let url = format!(
        "postgresql://test_user:test_password@{}:{}/test_bot_users",
        host, port
    );
    (url, container)
}
