//! Dungeon crawler HTTP adapter.
//!
//! Hosts playthroughs in memory and renders each scene as JSON, combining
//! the engine's scene data with the presentation table.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/content", routes::content::router())
        .nest("/api/v1/sessions", routes::sessions::router())
        .with_state(app_state)
}
