use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::load_dotenv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    load_dotenv();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        environment = ?config.environment,
        "Starting catalog API"
    );

    let db = connect_from_config_with_retry(config.database.clone(), None).await?;
    run_migrations::<Migrator>(&db, config.app.name).await?;

    let state = AppState { config, db };

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), state.config.request_timeout)?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    let AppState { config, db } = state;
    create_production_app(app, &config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Closing database pool");
        if let Err(e) = db.close().await {
            tracing::warn!(error = %e, "Failed to close database pool cleanly");
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
