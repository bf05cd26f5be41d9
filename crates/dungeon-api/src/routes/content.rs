//! Routes describing the loaded content.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    /// SHA-256 hash of the scene source.
    pub version: String,
    /// Scene every playthrough starts in.
    pub start_scene: String,
    /// Scene ids in authoring order.
    pub scene_ids: Vec<String>,
}

/// GET /
async fn describe_content(State(state): State<AppState>) -> Json<ContentResponse> {
    let registry = &state.registry;
    Json(ContentResponse {
        version: registry.version_hash().to_owned(),
        start_scene: registry.start_scene().to_string(),
        scene_ids: registry.scene_ids().iter().map(ToString::to_string).collect(),
    })
}

/// Returns the router for the content context.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(describe_content))
}
