//! YAML loaders for scene and presentation content.
//!
//! The authored format is flat: a choice names its target with
//! `to`, a junction with `junction`, or a special behaviour with `kind`.

use std::collections::HashMap;
use std::path::Path;

use dungeon_core::ids::SceneId;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::domain::presentation::{PresentationTable, SceneStyle};
use crate::domain::registry::SceneRegistry;
use crate::domain::scene::{Choice, ChoiceOutcome, JunctionOrigin, JunctionRoutes, SceneDefinition};
use crate::error::ContentError;

const BUILTIN_SCENES: &str = include_str!("../../content/scenes.yaml");
const BUILTIN_PRESENTATION: &str = include_str!("../../content/presentation.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentFile {
    start: SceneId,
    scenes: Vec<SceneEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneEntry {
    id: SceneId,
    #[serde(default)]
    entry_hp: Option<i32>,
    #[serde(default)]
    choices: Vec<ChoiceEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SpecialKind {
    Restart,
    Share,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChoiceEntry {
    action: String,
    #[serde(default)]
    to: Option<SceneId>,
    #[serde(default)]
    junction: Option<JunctionRoutes>,
    #[serde(default)]
    kind: Option<SpecialKind>,
    #[serde(default)]
    points: i32,
    #[serde(default)]
    penalty: bool,
    #[serde(default)]
    hp: Option<i32>,
    #[serde(default)]
    origin: Option<JunctionOrigin>,
}

impl ChoiceEntry {
    fn into_choice(self, scene_id: &SceneId) -> Result<Choice, ContentError> {
        let outcome = match (self.to, self.junction, self.kind) {
            (Some(to), None, None) => ChoiceOutcome::Goto { to },
            (None, Some(routes), None) => ChoiceOutcome::Junction { routes },
            (None, None, Some(SpecialKind::Restart)) => ChoiceOutcome::Restart,
            (None, None, Some(SpecialKind::Share)) => ChoiceOutcome::Share,
            _ => {
                return Err(ContentError::AmbiguousChoice {
                    scene_id: scene_id.clone(),
                    action_id: self.action,
                });
            }
        };

        Ok(Choice {
            action_id: self.action,
            outcome,
            point_delta: self.points,
            is_penalty: self.penalty,
            hp_delta: self.hp,
            junction_origin: self.origin,
        })
    }
}

/// Lowercase hex SHA-256 of a content source.
#[must_use]
pub fn version_hash(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

/// Parses and validates a scene registry from YAML.
///
/// # Errors
///
/// Returns `ContentError::Parse` for malformed YAML and the validation
/// variants of `ContentError` for broken references.
pub fn parse_registry(source: &str) -> Result<SceneRegistry, ContentError> {
    let file: ContentFile = serde_yaml::from_str(source)?;

    let mut definitions = Vec::with_capacity(file.scenes.len());
    for scene in file.scenes {
        let choices = scene
            .choices
            .into_iter()
            .map(|c| c.into_choice(&scene.id))
            .collect::<Result<Vec<_>, _>>()?;
        definitions.push(SceneDefinition {
            id: scene.id,
            entry_hp_delta: scene.entry_hp,
            choices,
        });
    }

    let registry = SceneRegistry::new(file.start, definitions, version_hash(source))?;
    info!(
        scenes = registry.len(),
        start = %registry.start_scene(),
        version_hash = registry.version_hash(),
        "loaded scene registry"
    );
    Ok(registry)
}

/// Parses a presentation table from YAML, checking it against a registry.
///
/// # Errors
///
/// Returns `ContentError::Parse` for malformed YAML and
/// `ContentError::UnknownPresentationScene` if a styled scene is not
/// registered.
pub fn parse_presentation(
    source: &str,
    registry: &SceneRegistry,
) -> Result<PresentationTable, ContentError> {
    let styles: HashMap<SceneId, SceneStyle> = serde_yaml::from_str(source)?;

    if let Some(unknown) = styles.keys().find(|id| !registry.contains(id.as_str())) {
        return Err(ContentError::UnknownPresentationScene(unknown.clone()));
    }

    info!(styled_scenes = styles.len(), "loaded presentation table");
    Ok(PresentationTable::new(styles))
}

fn read(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a scene registry from a YAML file.
///
/// # Errors
///
/// Returns `ContentError::Io` if the file cannot be read, otherwise as
/// [`parse_registry`].
pub fn load_registry_file(path: &Path) -> Result<SceneRegistry, ContentError> {
    parse_registry(&read(path)?)
}

/// Loads a presentation table from a YAML file.
///
/// # Errors
///
/// Returns `ContentError::Io` if the file cannot be read, otherwise as
/// [`parse_presentation`].
pub fn load_presentation_file(
    path: &Path,
    registry: &SceneRegistry,
) -> Result<PresentationTable, ContentError> {
    parse_presentation(&read(path)?, registry)
}

/// The scene registry shipped with the game.
///
/// # Errors
///
/// Returns `ContentError` if the bundled content fails validation.
pub fn builtin_registry() -> Result<SceneRegistry, ContentError> {
    parse_registry(BUILTIN_SCENES)
}

/// The presentation table shipped with the game.
///
/// # Errors
///
/// Returns `ContentError` if the bundled table references unknown scenes.
pub fn builtin_presentation(registry: &SceneRegistry) -> Result<PresentationTable, ContentError> {
    parse_presentation(BUILTIN_PRESENTATION, registry)
}
