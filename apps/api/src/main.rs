mod config;
mod errors;
mod layout;
mod llm_client;
mod measure;
mod models;
mod render;
mod routes;
mod state;
mod worksheet;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::MetricSurfaceHost;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting worksheet API v{}", env!("CARGO_PKG_VERSION"));

    let llm = match config.anthropic_api_key.clone() {
        Some(key) => {
            let client = LlmClient::new(key)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, generation endpoint disabled");
            None
        }
    };

    let capacity = config.capacity();
    info!(
        width = capacity.page_width,
        height = capacity.page_height,
        available = capacity.available_height(),
        margin = capacity.element_margin,
        font = ?config.font_family,
        "Page capacity configured"
    );

    let state = AppState {
        llm,
        capacity,
        config: config.clone(),
        surface_host: Arc::new(MetricSurfaceHost::new(config.font_family)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
