//! Content loading errors.

use std::path::PathBuf;

use dungeon_core::ids::SceneId;
use thiserror::Error;

/// Errors raised while loading or validating scene content.
///
/// All of these indicate a broken authoring reference and are fatal at
/// startup.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The YAML source could not be parsed.
    #[error("content parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A content file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Two scenes share an id.
    #[error("duplicate scene id: {0}")]
    DuplicateScene(SceneId),

    /// Two choices in one scene share an action id.
    #[error("duplicate action {action_id:?} in scene {scene_id}")]
    DuplicateAction {
        /// The scene containing the duplicate.
        scene_id: SceneId,
        /// The repeated action id.
        action_id: String,
    },

    /// A choice leads to a scene that is not registered.
    #[error("choice {action_id:?} in scene {scene_id} targets unknown scene {target}")]
    DanglingTarget {
        /// The scene containing the choice.
        scene_id: SceneId,
        /// The offending action.
        action_id: String,
        /// The unresolved target.
        target: SceneId,
    },

    /// The declared start scene is not registered.
    #[error("start scene {0} is not registered")]
    MissingStartScene(SceneId),

    /// A choice must declare exactly one of `to`, `junction` or `kind`.
    #[error("choice {action_id:?} in scene {scene_id} must declare exactly one of to, junction or kind")]
    AmbiguousChoice {
        /// The scene containing the choice.
        scene_id: SceneId,
        /// The offending action.
        action_id: String,
    },

    /// The presentation table styles a scene the registry does not know.
    #[error("presentation entry for unknown scene {0}")]
    UnknownPresentationScene(SceneId),
}
