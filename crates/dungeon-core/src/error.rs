//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ids::SceneId;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A play session was not found.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A scene id did not resolve to a registered scene.
    #[error("scene not found: {0}")]
    SceneNotFound(SceneId),

    /// The chosen action is not offered by the current scene.
    #[error("unknown action {action_id:?} in scene {scene_id}")]
    UnknownAction {
        /// The scene the player was in.
        scene_id: SceneId,
        /// The action that was requested.
        action_id: String,
    },

    /// A junction choice was taken without a recorded origin.
    #[error("junction in scene {scene_id} has no recorded origin")]
    JunctionUnresolved {
        /// The junction scene.
        scene_id: SceneId,
    },
}
