//! Visited-transition tracking.

use std::collections::HashSet;

use dungeon_core::ids::SceneId;

/// Separator used when rendering an edge as a record key.
pub const EDGE_SEPARATOR: char = '→';

/// Records which scenes were entered and which edges were taken.
///
/// Scene records gate first-visit rewards; edge records gate penalties so a
/// repeated backward move is only punished once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedTracker {
    scenes: HashSet<SceneId>,
    edges: HashSet<(SceneId, SceneId)>,
}

impl VisitedTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Has this scene ever been the destination of a transition?
    #[must_use]
    pub fn has_entered(&self, scene: &SceneId) -> bool {
        self.scenes.contains(scene)
    }

    /// Has this exact edge been taken before?
    #[must_use]
    pub fn has_taken(&self, from: &SceneId, to: &SceneId) -> bool {
        self.edges.contains(&(from.clone(), to.clone()))
    }

    /// Marks both the destination and the edge. Idempotent.
    pub fn mark(&mut self, from: &SceneId, to: &SceneId) {
        self.scenes.insert(to.clone());
        self.edges.insert((from.clone(), to.clone()));
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.scenes.clear();
        self.edges.clear();
    }

    /// Total number of scene and edge records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len() + self.edges.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty() && self.edges.is_empty()
    }

    /// All records as sorted keys: `"scene"` and `"from→to"`.
    #[must_use]
    pub fn records(&self) -> Vec<String> {
        let mut records: Vec<String> = self
            .scenes
            .iter()
            .map(ToString::to_string)
            .chain(
                self.edges
                    .iter()
                    .map(|(from, to)| format!("{from}{EDGE_SEPARATOR}{to}")),
            )
            .collect();
        records.sort();
        records
    }
}
