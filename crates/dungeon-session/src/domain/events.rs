//! Domain events for a playthrough.
//!
//! The session changes state only by applying these, so the recorded stream
//! describes every scene change and stat change in order. Presentation
//! adapters drain them to drive rendering.

use dungeon_content::domain::scene::JunctionOrigin;
use dungeon_core::event::{DomainEvent, EventMetadata};
use dungeon_core::ids::SceneId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted once when a playthrough is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The new session.
    pub session_id: Uuid,
    /// Scene the playthrough starts in.
    pub start_scene: SceneId,
    /// Version hash of the content the session runs against.
    pub content_version: String,
}

/// Emitted whenever the current scene changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntered {
    /// Scene left behind; `None` when (re)starting.
    pub from: Option<SceneId>,
    /// Scene now current.
    pub to: SceneId,
}

/// Why points changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsReason {
    /// First arrival in a scene.
    Reward,
    /// First time taking a penalised edge.
    Penalty,
}

/// Emitted when a transition changes points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAdjusted {
    /// Requested change, before clamping.
    pub delta: i64,
    /// Reward or penalty.
    pub reason: PointsReason,
}

/// Where an HP change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HpSource {
    /// The effect of taking a choice.
    Choice,
    /// The entry effect of a scene.
    SceneEntry,
}

/// Emitted when HP changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpAdjusted {
    /// Requested change, before clamping.
    pub delta: i32,
    /// Choice or scene entry.
    pub source: HpSource,
}

/// Emitted when a choice tags the route into a junction scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionOriginRecorded {
    /// The recorded origin.
    pub origin: JunctionOrigin,
}

/// Emitted after any command whose net effect changed the stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsChanged {
    /// HP after the change.
    pub hp: i32,
    /// Points after the change.
    pub points: i64,
}

/// Emitted when the playthrough is reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRestarted {
    /// Scene the new playthrough starts in.
    pub start_scene: SceneId,
}

/// Emitted when the player asks to share their score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequested {
    /// Points at the time of the request.
    pub points: i64,
}

/// Event payload variants for a playthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A playthrough was created.
    SessionStarted(SessionStarted),
    /// The current scene changed.
    SceneEntered(SceneEntered),
    /// Points changed.
    PointsAdjusted(PointsAdjusted),
    /// HP changed.
    HpAdjusted(HpAdjusted),
    /// A junction origin was recorded.
    JunctionOriginRecorded(JunctionOriginRecorded),
    /// Stats changed and should be redisplayed.
    StatsChanged(StatsChanged),
    /// The playthrough was reset.
    GameRestarted(GameRestarted),
    /// The score should be shared.
    ShareRequested(ShareRequested),
}

impl GameEventKind {
    /// The event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => "session.started",
            Self::SceneEntered(_) => "session.scene_entered",
            Self::PointsAdjusted(_) => "session.points_adjusted",
            Self::HpAdjusted(_) => "session.hp_adjusted",
            Self::JunctionOriginRecorded(_) => "session.junction_origin_recorded",
            Self::StatsChanged(_) => "session.stats_changed",
            Self::GameRestarted(_) => "session.restarted",
            Self::ShareRequested(_) => "session.share_requested",
        }
    }
}

/// Domain event envelope for a playthrough.
#[derive(Debug, Clone)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
