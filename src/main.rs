//! HTTP server for the tax engine.
//!
//! Environment:
//! - `TAX_ENGINE_CONFIG_DIR`: directory holding the tax year YAML files
//!   (default `./config/irs_2024`)
//! - `TAX_ENGINE_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `RUST_LOG`: log filter (default `tax_engine=info`)

use tax_engine::api::{AppState, create_router};
use tax_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/irs_2024";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tax_engine=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let config_dir =
        std::env::var("TAX_ENGINE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = std::env::var("TAX_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        tax_year = config.tax_year().tax_year,
        config_dir = %config_dir,
        "Starting tax engine"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
