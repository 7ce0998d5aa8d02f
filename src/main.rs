use chrono::Local;
use dotenvy::dotenv;
use meal_buddy::{
    config::{catalog, database},
    core::{report, week_key},
    errors::Result,
};
use std::{env, path::PathBuf};
use tracing::{error, info, warn};
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

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed the catalog if a file is available
    let catalog_path =
        env::var("CATALOG_PATH").map_or_else(|_| PathBuf::from("catalog.toml"), PathBuf::from);
    if catalog_path.exists() {
        let config = catalog::load_config(&catalog_path)?;
        let summary = catalog::seed_catalog(&db, &config)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
        if !summary.is_empty() {
            info!(?summary, "Catalog updated from {}", catalog_path.display());
        }
    } else {
        warn!("No catalog file at {}, skipping seeding", catalog_path.display());
    }

    // 5. Print this week's usage
    let week = week_key(Local::now().date_naive());
    let weekly = report::generate_weekly_report(&db, week).await?;
    print!("{}", report::format_weekly_summary(&weekly));

    Ok(())
}
