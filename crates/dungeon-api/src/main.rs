//! Dungeon crawler API server entry point.

use std::error::Error;
use std::sync::Arc;

use dungeon_api::config::ServerConfig;
use dungeon_api::state::AppState;
use dungeon_core::clock::SystemClock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting dungeon crawler API server");

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    // Content is loaded and validated once; a bad table aborts startup.
    let app_state = AppState::load(&config, Arc::new(SystemClock))?;

    let app = dungeon_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
