//! The transition engine: one playthrough as an aggregate root.

use std::sync::Arc;

use dungeon_content::domain::registry::SceneRegistry;
use dungeon_content::domain::scene::{ChoiceOutcome, JunctionOrigin, SceneDefinition};
use dungeon_core::aggregate::AggregateRoot;
use dungeon_core::clock::Clock;
use dungeon_core::error::DomainError;
use dungeon_core::event::EventMetadata;
use dungeon_core::ids::SceneId;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::{
    GameEvent, GameEventKind, GameRestarted, HpAdjusted, HpSource, JunctionOriginRecorded,
    PointsAdjusted, PointsReason, SceneEntered, SessionStarted, ShareRequested, StatsChanged,
};
use super::stats::PlayerStats;
use super::visited::VisitedTracker;

/// Where the player is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// The scene being displayed.
    pub current_scene_id: SceneId,
    /// The scene left by the last transition.
    pub previous_scene_id: Option<SceneId>,
    /// Origin used to route out of junction scenes.
    pub junction_origin: Option<JunctionOrigin>,
}

impl GameState {
    fn at(scene: SceneId) -> Self {
        Self {
            current_scene_id: scene,
            previous_scene_id: None,
            junction_origin: None,
        }
    }
}

/// What a successful `choose` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChoiceResult {
    /// The player moved between scenes.
    Moved {
        /// Scene left.
        from: SceneId,
        /// Scene entered.
        to: SceneId,
    },
    /// The playthrough was reset.
    Restarted {
        /// Scene the new playthrough starts in.
        start_scene: SceneId,
    },
    /// The player asked to share their score.
    ShareRequested {
        /// Points to share.
        points: i64,
    },
}

/// The aggregate root for a single playthrough.
///
/// Holds stats, visited records and position. All state changes go through
/// recorded events; the caller drains them with
/// [`AggregateRoot::uncommitted_events`] to update the display.
#[derive(Debug)]
pub struct GameSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    registry: Arc<SceneRegistry>,
    pub(crate) stats: PlayerStats,
    pub(crate) visited: VisitedTracker,
    pub(crate) state: GameState,
    /// Events recorded since the last drain.
    uncommitted_events: Vec<GameEvent>,
}

impl GameSession {
    fn blank(id: Uuid, registry: Arc<SceneRegistry>) -> Self {
        let start = registry.start_scene().clone();
        Self {
            id,
            version: 0,
            registry,
            stats: PlayerStats::new(),
            visited: VisitedTracker::new(),
            state: GameState::at(start),
            uncommitted_events: Vec::new(),
        }
    }

    /// Starts a new playthrough in the registry's start scene.
    #[must_use]
    pub fn start(
        id: Uuid,
        registry: Arc<SceneRegistry>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        let mut session = Self::blank(id, registry);
        let start_scene = session.registry.start_scene().clone();
        let content_version = session.registry.version_hash().to_owned();
        let before = session.stats;

        session.record(
            GameEventKind::SessionStarted(SessionStarted {
                session_id: id,
                start_scene: start_scene.clone(),
                content_version,
            }),
            correlation_id,
            clock,
        );
        session.enter_start_scene(correlation_id, clock);
        session.notify_stats(before, correlation_id, clock);

        info!(session_id = %id, start = %start_scene, "session started");
        session
    }

    /// Rebuilds a playthrough by applying previously recorded events.
    #[must_use]
    pub fn from_history(id: Uuid, registry: Arc<SceneRegistry>, events: &[GameEvent]) -> Self {
        let mut session = Self::blank(id, registry);
        for event in events {
            session.apply(event);
        }
        session
    }

    /// The scene the player is in.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the current id is not
    /// registered.
    pub fn current_scene(&self) -> Result<&SceneDefinition, DomainError> {
        self.registry.get(&self.state.current_scene_id)
    }

    /// Current stats.
    #[must_use]
    pub fn stats(&self) -> PlayerStats {
        self.stats
    }

    /// Current position.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Scenes entered and edges taken so far.
    #[must_use]
    pub fn visited(&self) -> &VisitedTracker {
        &self.visited
    }

    /// The content this playthrough runs against.
    #[must_use]
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Returns `true` while HP is above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    /// Takes one of the current scene's choices.
    ///
    /// On error nothing is recorded and the session is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownAction` if the current scene offers no
    /// such action, `DomainError::JunctionUnresolved` if a junction is taken
    /// before any origin was recorded, and `DomainError::SceneNotFound` if
    /// the content references a missing scene.
    pub fn choose(
        &mut self,
        action_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<ChoiceResult, DomainError> {
        let registry = Arc::clone(&self.registry);
        let from = self.state.current_scene_id.clone();
        let scene = registry.get(&from)?;

        let Some(choice) = scene.choice(action_id) else {
            warn!(session_id = %self.id, scene = %from, action_id, "ignoring unknown action");
            return Err(DomainError::UnknownAction {
                scene_id: from,
                action_id: action_id.to_owned(),
            });
        };

        let to = match &choice.outcome {
            ChoiceOutcome::Goto { to } => to.clone(),
            ChoiceOutcome::Junction { routes } => {
                let Some(origin) = self.state.junction_origin else {
                    warn!(session_id = %self.id, scene = %from, action_id, "junction taken without a recorded origin");
                    return Err(DomainError::JunctionUnresolved { scene_id: from });
                };
                routes.route(origin).clone()
            }
            ChoiceOutcome::Restart => {
                self.restart(correlation_id, clock);
                return Ok(ChoiceResult::Restarted {
                    start_scene: self.state.current_scene_id.clone(),
                });
            }
            ChoiceOutcome::Share => {
                let points = self.stats.points();
                self.record(
                    GameEventKind::ShareRequested(ShareRequested { points }),
                    correlation_id,
                    clock,
                );
                info!(session_id = %self.id, points, "share requested");
                return Ok(ChoiceResult::ShareRequested { points });
            }
        };

        registry.get(&to)?;

        let before = self.stats;
        if let Some(origin) = choice.junction_origin {
            self.record(
                GameEventKind::JunctionOriginRecorded(JunctionOriginRecorded { origin }),
                correlation_id,
                clock,
            );
        }
        if let Some(delta) = choice.hp_delta {
            self.record(
                GameEventKind::HpAdjusted(HpAdjusted {
                    delta,
                    source: HpSource::Choice,
                }),
                correlation_id,
                clock,
            );
        }
        self.transition_inner(
            &from,
            &to,
            choice.point_delta,
            choice.is_penalty,
            correlation_id,
            clock,
        )?;
        self.notify_stats(before, correlation_id, clock);

        Ok(ChoiceResult::Moved { from, to })
    }

    /// Moves from `from` to `to`, applying the point rules and the entry
    /// effect of `to`.
    ///
    /// Penalties apply only the first time this exact edge is taken; rewards
    /// apply only the first time `to` is entered. Entry HP effects apply on
    /// every entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if `to` is not registered; the
    /// session is then unchanged.
    pub fn transition(
        &mut self,
        from: &SceneId,
        to: &SceneId,
        point_delta: i32,
        is_penalty: bool,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let before = self.stats;
        self.transition_inner(from, to, point_delta, is_penalty, correlation_id, clock)?;
        self.notify_stats(before, correlation_id, clock);
        Ok(())
    }

    /// Resets stats, visited records and position to a fresh playthrough.
    pub fn restart(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let before = self.stats;
        let start_scene = self.registry.start_scene().clone();

        self.record(
            GameEventKind::GameRestarted(GameRestarted {
                start_scene: start_scene.clone(),
            }),
            correlation_id,
            clock,
        );
        self.enter_start_scene(correlation_id, clock);
        self.notify_stats(before, correlation_id, clock);

        info!(session_id = %self.id, start = %start_scene, "session restarted");
    }

    fn transition_inner(
        &mut self,
        from: &SceneId,
        to: &SceneId,
        point_delta: i32,
        is_penalty: bool,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let entry_hp_delta = self.registry.get(to)?.entry_hp_delta;

        if point_delta != 0 {
            let first_time = if is_penalty {
                !self.visited.has_taken(from, to)
            } else {
                !self.visited.has_entered(to)
            };
            if first_time {
                let reason = if is_penalty {
                    PointsReason::Penalty
                } else {
                    PointsReason::Reward
                };
                self.record(
                    GameEventKind::PointsAdjusted(PointsAdjusted {
                        delta: i64::from(point_delta),
                        reason,
                    }),
                    correlation_id,
                    clock,
                );
            } else {
                debug!(session_id = %self.id, %from, %to, point_delta, "points already applied for this transition");
            }
        }

        self.record(
            GameEventKind::SceneEntered(SceneEntered {
                from: Some(from.clone()),
                to: to.clone(),
            }),
            correlation_id,
            clock,
        );
        self.apply_entry_effect(entry_hp_delta, correlation_id, clock);

        info!(
            session_id = %self.id,
            %from,
            %to,
            hp = self.stats.hp(),
            points = self.stats.points(),
            "transitioned"
        );
        Ok(())
    }

    fn enter_start_scene(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let start_scene = self.registry.start_scene().clone();
        let entry_hp_delta = self
            .registry
            .get(&start_scene)
            .ok()
            .and_then(|scene| scene.entry_hp_delta);

        self.record(
            GameEventKind::SceneEntered(SceneEntered {
                from: None,
                to: start_scene,
            }),
            correlation_id,
            clock,
        );
        self.apply_entry_effect(entry_hp_delta, correlation_id, clock);
    }

    fn apply_entry_effect(&mut self, delta: Option<i32>, correlation_id: Uuid, clock: &dyn Clock) {
        if let Some(delta) = delta {
            self.record(
                GameEventKind::HpAdjusted(HpAdjusted {
                    delta,
                    source: HpSource::SceneEntry,
                }),
                correlation_id,
                clock,
            );
        }
    }

    fn notify_stats(&mut self, before: PlayerStats, correlation_id: Uuid, clock: &dyn Clock) {
        if self.stats != before {
            self.record(
                GameEventKind::StatsChanged(StatsChanged {
                    hp: self.stats.hp(),
                    points: self.stats.points(),
                }),
                correlation_id,
                clock,
            );
        }
    }

    fn record(&mut self, kind: GameEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = GameEvent {
            metadata: EventMetadata::for_command(
                kind.event_type(),
                self.id,
                self.version + 1,
                correlation_id,
                clock.now(),
            ),
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for GameSession {
    type Event = GameEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            GameEventKind::SessionStarted(payload) => {
                self.state = GameState::at(payload.start_scene.clone());
            }
            GameEventKind::SceneEntered(payload) => {
                if let Some(from) = &payload.from {
                    self.visited.mark(from, &payload.to);
                }
                self.state.previous_scene_id.clone_from(&payload.from);
                self.state.current_scene_id = payload.to.clone();
            }
            GameEventKind::PointsAdjusted(payload) => self.stats.add_points(payload.delta),
            GameEventKind::HpAdjusted(payload) => self.stats.add_hp(payload.delta),
            GameEventKind::JunctionOriginRecorded(payload) => {
                self.state.junction_origin = Some(payload.origin);
            }
            GameEventKind::GameRestarted(payload) => {
                self.stats.reset();
                self.visited.clear();
                self.state = GameState::at(payload.start_scene.clone());
            }
            GameEventKind::StatsChanged(_) | GameEventKind::ShareRequested(_) => {}
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
