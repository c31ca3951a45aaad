//! Service entry point: configuration, database setup, catalog seeding, and
//! the HTTP server loop.

use dotenvy::dotenv;
use epr_api::{api, config, core, errors::Result};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 4. Seed the material catalog from config.toml
    let catalog = config::catalog::load_default_catalog()
        .inspect_err(|e| error!("Failed to load material catalog: {e}"))?;
    let inserted = core::material::seed_materials(&db, &catalog.materials)
        .await
        .inspect_err(|e| error!("Failed to seed material catalog: {e}"))?;
    info!("Material catalog seeded ({inserted} new materials).");

    // 5. Serve the HTTP API
    let state = api::AppState::new(db);
    let app = api::build_router(state);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("epr-api listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
