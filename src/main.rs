use dotenvy::dotenv;
use party_kitchen::{
    auth::LocalIdentityProvider,
    config::{
        database,
        seed::{self, DEFAULT_SEED_PATH},
    },
    errors::Result,
};
use std::{env, path::Path};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed catalog and admin from the seed file, if there is one
    let seed_path = env::var("SEED_CONFIG").unwrap_or_else(|_| DEFAULT_SEED_PATH.to_string());
    if !Path::new(&seed_path).exists() {
        info!("No seed file at {}, skipping seeding.", seed_path);
        return Ok(());
    }
    let config = seed::load_config(&seed_path)
        .inspect_err(|e| error!("Failed to load seed file {}: {}", seed_path, e))?;

    let food_items = seed::seed_catalog(&db, &config)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // ADMIN_PASSWORD is read here, directly before use, never from the seed file
    let provider = LocalIdentityProvider::new(db.clone());
    let admin = seed::seed_admin(&db, &provider, &config, env::var("ADMIN_PASSWORD").ok())
        .await
        .inspect_err(|e| error!("Failed to provision admin account: {}", e))?;

    info!(
        "Startup complete: {} food items added, admin {}",
        food_items,
        admin.map_or_else(|| "unchanged".to_string(), |a| format!("created ({})", a.email))
    );
    Ok(())
}
