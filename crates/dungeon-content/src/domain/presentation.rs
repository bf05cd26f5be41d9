//! Presentation data, kept apart from the engine's scene table.
//!
//! Renderers read this; the transition engine never does.

use std::collections::{BTreeMap, HashMap};

use dungeon_core::ids::SceneId;
use serde::{Deserialize, Serialize};

/// Placeholder in prompt lines replaced with the player's current points.
pub const POINTS_PLACEHOLDER: &str = "{POINTS}";

/// How a single scene is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneStyle {
    /// Short description of the scene.
    #[serde(default)]
    pub description: String,
    /// Background image file.
    #[serde(default)]
    pub image: Option<String>,
    /// Dialog prompt, one entry per line.
    #[serde(default)]
    pub prompt: Vec<String>,
    /// Button labels keyed by action id.
    #[serde(default)]
    pub buttons: BTreeMap<String, String>,
    /// Text revealed letter by letter over the scene.
    #[serde(default)]
    pub typewriter: Option<String>,
}

impl SceneStyle {
    /// Prompt lines with the points placeholder substituted.
    #[must_use]
    pub fn render_prompt(&self, points: i64) -> Vec<String> {
        let points = points.to_string();
        self.prompt
            .iter()
            .map(|line| line.replace(POINTS_PLACEHOLDER, &points))
            .collect()
    }

    /// Label for an action button, falling back to the action id.
    #[must_use]
    pub fn button_label<'a>(&'a self, action_id: &'a str) -> &'a str {
        self.buttons.get(action_id).map_or(action_id, String::as_str)
    }
}

/// Display data for every styled scene.
#[derive(Debug, Default)]
pub struct PresentationTable {
    styles: HashMap<SceneId, SceneStyle>,
}

impl PresentationTable {
    /// Creates a table from per-scene styles.
    #[must_use]
    pub fn new(styles: HashMap<SceneId, SceneStyle>) -> Self {
        Self { styles }
    }

    /// Style for a scene, if one was authored.
    #[must_use]
    pub fn get(&self, id: &SceneId) -> Option<&SceneStyle> {
        self.styles.get(id)
    }

    /// Number of styled scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns `true` if nothing is styled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
