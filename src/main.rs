//! Bot user store
//!
//! Process entry point: loads configuration, sets up logging, connects to the
//! database and makes sure the users table exists.

use anyhow::Context;
use tracing::{error, info, warn};

use bot_user_store::{config::Settings, utils::logging, DatabaseService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the environment.
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", bot_user_store::info());

    if let Err(e) = settings.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    // Initialize database connection
    info!("Connecting to database...");
    let database = DatabaseService::connect(&settings.database);

    if let Err(e) = database.health_check().await {
        warn!(error = %e, "Database is not reachable yet; operations will fail until it is");
    }

    // Schema failures are not fatal: every later operation reports its own error.
    if let Err(e) = database.init_schema().await {
        error!(error = %e, "Schema initialization failed");
    }

    info!("User store is ready");
    Ok(())
}
