//! Scene definitions as seen by the transition engine.
//!
//! These types carry only narrative state-machine data: where a choice leads
//! and which stat effects it has. Display data lives in
//! [`presentation`](super::presentation).

use dungeon_core::ids::SceneId;
use serde::{Deserialize, Serialize};

/// Which question scene last routed the player into a junction scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionOrigin {
    /// The first question leading into the junction.
    First,
    /// The second question leading into the junction.
    Second,
}

/// Destinations of a junction choice, one per origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JunctionRoutes {
    /// Destination when the player arrived from the first origin.
    pub first: SceneId,
    /// Destination when the player arrived from the second origin.
    pub second: SceneId,
}

impl JunctionRoutes {
    /// Returns the destination for the given origin.
    #[must_use]
    pub fn route(&self, origin: JunctionOrigin) -> &SceneId {
        match origin {
            JunctionOrigin::First => &self.first,
            JunctionOrigin::Second => &self.second,
        }
    }
}

/// What happens when a choice is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChoiceOutcome {
    /// Move to a fixed scene.
    Goto {
        /// The destination scene.
        to: SceneId,
    },
    /// Move to a scene that depends on the recorded junction origin.
    Junction {
        /// Destination per origin.
        routes: JunctionRoutes,
    },
    /// Reset the whole playthrough.
    Restart,
    /// Hand the current score to the sharing collaborator.
    Share,
}

/// A player-selectable option in a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Identifier the presentation layer sends back when the option is picked.
    pub action_id: String,
    /// Where the choice leads.
    pub outcome: ChoiceOutcome,
    /// Points added (or removed when negative) by the transition.
    pub point_delta: i32,
    /// Penalties are keyed by edge, rewards by destination.
    pub is_penalty: bool,
    /// HP change applied every time the choice is taken, before moving.
    pub hp_delta: Option<i32>,
    /// Origin recorded for a later junction scene.
    pub junction_origin: Option<JunctionOrigin>,
}

impl Choice {
    /// Scene ids this choice can lead to.
    pub fn targets(&self) -> impl Iterator<Item = &SceneId> {
        let (a, b) = match &self.outcome {
            ChoiceOutcome::Goto { to } => (Some(to), None),
            ChoiceOutcome::Junction { routes } => (Some(&routes.first), Some(&routes.second)),
            ChoiceOutcome::Restart | ChoiceOutcome::Share => (None, None),
        };
        a.into_iter().chain(b)
    }
}

/// One narrative beat with its choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDefinition {
    /// Unique scene identifier.
    pub id: SceneId,
    /// HP change applied on every entry into this scene.
    pub entry_hp_delta: Option<i32>,
    /// Ordered choices offered to the player.
    pub choices: Vec<Choice>,
}

impl SceneDefinition {
    /// Looks up a choice by its action id.
    #[must_use]
    pub fn choice(&self, action_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.action_id == action_id)
    }

    /// A terminal scene only offers restart or share.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.choices.iter().all(|c| {
            matches!(c.outcome, ChoiceOutcome::Restart | ChoiceOutcome::Share)
        })
    }
}
