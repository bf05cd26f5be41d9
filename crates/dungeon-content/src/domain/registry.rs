//! The immutable scene registry.

use std::collections::{HashMap, HashSet};

use dungeon_core::error::DomainError;
use dungeon_core::ids::SceneId;

use super::scene::SceneDefinition;
use crate::error::ContentError;

/// Validated, read-only mapping from scene id to scene definition.
///
/// Construction checks that ids are unique, that every choice target
/// resolves, and that the start scene exists. After that the registry is
/// never mutated.
#[derive(Debug)]
pub struct SceneRegistry {
    scenes: HashMap<SceneId, SceneDefinition>,
    order: Vec<SceneId>,
    start: SceneId,
    version_hash: String,
}

impl SceneRegistry {
    /// Builds a registry from authored scenes.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if ids collide, an action is repeated within a
    /// scene, a target does not resolve, or the start scene is missing.
    pub fn new(
        start: SceneId,
        definitions: Vec<SceneDefinition>,
        version_hash: String,
    ) -> Result<Self, ContentError> {
        let mut scenes = HashMap::with_capacity(definitions.len());
        let mut order = Vec::with_capacity(definitions.len());

        for scene in definitions {
            let mut actions = HashSet::new();
            for choice in &scene.choices {
                if !actions.insert(choice.action_id.as_str()) {
                    return Err(ContentError::DuplicateAction {
                        scene_id: scene.id.clone(),
                        action_id: choice.action_id.clone(),
                    });
                }
            }
            if scenes.contains_key(&scene.id) {
                return Err(ContentError::DuplicateScene(scene.id));
            }
            order.push(scene.id.clone());
            scenes.insert(scene.id.clone(), scene);
        }

        for id in &order {
            let scene = &scenes[id];
            for choice in &scene.choices {
                if let Some(target) = choice.targets().find(|t| !scenes.contains_key(*t)) {
                    return Err(ContentError::DanglingTarget {
                        scene_id: scene.id.clone(),
                        action_id: choice.action_id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        if !scenes.contains_key(&start) {
            return Err(ContentError::MissingStartScene(start));
        }

        Ok(Self {
            scenes,
            order,
            start,
            version_hash,
        })
    }

    /// Looks up a scene by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if no scene has that id.
    pub fn get(&self, id: &SceneId) -> Result<&SceneDefinition, DomainError> {
        self.scenes
            .get(id)
            .ok_or_else(|| DomainError::SceneNotFound(id.clone()))
    }

    /// Returns `true` if a scene with this id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    /// The scene every playthrough starts in.
    #[must_use]
    pub fn start_scene(&self) -> &SceneId {
        &self.start
    }

    /// SHA-256 of the content source, as lowercase hex.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }

    /// Scene ids in authored order.
    #[must_use]
    pub fn scene_ids(&self) -> &[SceneId] {
        &self.order
    }

    /// Number of registered scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no scenes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
