//! HTTP server for the Faraid distribution engine.
//!
//! Reads configuration from `FARAID_CONFIG_DIR` (default `./config/faraid`)
//! and serves the API on the configured host and port.

use faraid_engine::api::{create_router, AppState};
use faraid_engine::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faraid_engine=info".into()),
        )
        .init();

    let config_dir =
        std::env::var("FARAID_CONFIG_DIR").unwrap_or_else(|_| "./config/faraid".into());
    let config = ConfigLoader::load(&config_dir)?;

    let bind_addr = format!("{}:{}", config.server().host, config.server().port);
    info!(
        config_dir = %config_dir,
        engine = %config.metadata().name,
        version = %config.metadata().version,
        school = %config.metadata().school,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
