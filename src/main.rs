use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use resonance_api::{
    config::Config,
    routes::{create_router, AppState},
    services::providers::spotify::SpotifyConnector,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resonance_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let settings = config
        .pipeline_settings()
        .context("invalid pipeline configuration")?;

    let connector = SpotifyConnector::new(
        config.catalog_api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let state = Arc::new(AppState {
        connector: Arc::new(connector),
        settings,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, catalog = %config.catalog_api_url, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
