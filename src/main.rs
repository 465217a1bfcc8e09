mod config;
mod error;
mod feed;
mod fetcher;
mod render;
mod routes;
mod xml;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starlinks=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load_or_default("starlinks.toml")?;
    info!("Republishing feed: {}", config.feed_url);

    let fetcher = Arc::new(Fetcher::new(
        config.feed_url.clone(),
        Duration::from_secs(config.cache_ttl_secs),
    ));

    let state = Arc::new(AppState { fetcher });
    let app = routes::build_router(state, &config.public_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server starting on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
