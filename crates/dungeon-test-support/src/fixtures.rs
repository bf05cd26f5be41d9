//! Content fixtures.

use std::sync::Arc;

use dungeon_content::application::loader;
use dungeon_content::domain::presentation::PresentationTable;
use dungeon_content::domain::registry::SceneRegistry;

/// A three-scene map where the damaging `pit` can be reached along two
/// different paths, and `hall` along two different penalised edges.
pub const HAZARD_SCENES: &str = r"
start: hall
scenes:
  - id: hall
    choices:
      - action: left
        to: pit
        points: 100
      - action: right
        to: bridge
  - id: bridge
    choices:
      - action: jump
        to: pit
        points: 100
      - action: back
        to: hall
        points: -30
        penalty: true
  - id: pit
    entry_hp: -50
    choices:
      - action: climb
        to: bridge
      - action: flee
        to: hall
        points: -30
        penalty: true
";

/// The registry shipped with the game.
///
/// # Panics
///
/// Panics if the bundled content fails to load.
#[must_use]
pub fn builtin_registry() -> Arc<SceneRegistry> {
    Arc::new(loader::builtin_registry().expect("bundled scenes are valid"))
}

/// The presentation table shipped with the game.
///
/// # Panics
///
/// Panics if the bundled content fails to load.
#[must_use]
pub fn builtin_presentation(registry: &SceneRegistry) -> Arc<PresentationTable> {
    Arc::new(loader::builtin_presentation(registry).expect("bundled presentation is valid"))
}

/// Registry built from [`HAZARD_SCENES`].
///
/// # Panics
///
/// Panics if the fixture fails to load.
#[must_use]
pub fn hazard_registry() -> Arc<SceneRegistry> {
    Arc::new(loader::parse_registry(HAZARD_SCENES).expect("hazard fixture is valid"))
}
