mod backoff;
mod config;
mod document;
mod errors;
mod planning;
mod render;
mod requester;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backoff::{BackoffClient, HttpTransport};
use crate::config::Config;
use crate::requester::images::ImageFinder;
use crate::requester::ContentRequester;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key or invalid policy)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sitewright API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by every outbound call
    let client = BackoffClient::new(Arc::new(HttpTransport::new()));
    info!(
        "Backoff policy: {} attempts, base {:?}, multiplier {} (up to {:?} waiting)",
        config.backoff.max_attempts(),
        config.backoff.base_delay(),
        config.backoff.multiplier(),
        config.backoff.total_delay()
    );

    let requester = ContentRequester::new(client.clone(), &config);
    info!("Content requester initialized (model: {})", config.completion_model);

    let images = ImageFinder::new(client, &config);
    if config.unsplash_access_key.is_none() {
        info!("No image search key configured; generated images use a placeholder");
    }
    info!("Image cache at {}", images.cache_dir().display());

    let state = AppState { requester, images };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
