//! Query handlers for playthroughs.
//!
//! These return read-only views of a stored session.

use dungeon_content::domain::scene::{JunctionOrigin, SceneDefinition};
use dungeon_core::aggregate::AggregateRoot;
use dungeon_core::error::DomainError;
use dungeon_core::ids::SceneId;
use serde::Serialize;
use uuid::Uuid;

use crate::application::store::InMemorySessionStore;
use crate::domain::aggregates::GameSession;

/// Stats as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsView {
    /// Current HP.
    pub hp: i32,
    /// Current points.
    pub points: i64,
    /// Whether HP is above zero.
    pub alive: bool,
}

impl StatsView {
    fn of(session: &GameSession) -> Self {
        let stats = session.stats();
        Self {
            hp: stats.hp(),
            points: stats.points(),
            alive: stats.is_alive(),
        }
    }
}

/// Read-only view of a session aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct GameSessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The scene being displayed.
    pub current_scene_id: SceneId,
    /// The scene left by the last transition.
    pub previous_scene_id: Option<SceneId>,
    /// Origin recorded for junction scenes.
    pub junction_origin: Option<JunctionOrigin>,
    /// Player stats.
    pub stats: StatsView,
    /// Visited records as `"scene"` and `"from→to"` keys.
    pub visited: Vec<String>,
    /// Current version (event count).
    pub version: i64,
    /// Version hash of the content the session runs against.
    pub content_version: String,
}

impl GameSessionView {
    /// Builds a view of a session.
    #[must_use]
    pub fn of(session: &GameSession) -> Self {
        let state = session.state();
        Self {
            session_id: session.id,
            current_scene_id: state.current_scene_id.clone(),
            previous_scene_id: state.previous_scene_id.clone(),
            junction_origin: state.junction_origin,
            stats: StatsView::of(session),
            visited: session.visited().records(),
            version: session.version(),
            content_version: session.registry().version_hash().to_owned(),
        }
    }
}

/// A session view paired with the scene it is showing.
///
/// Both halves are read under the same lock, so `scene.id` always equals
/// `view.current_scene_id`.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// The session state.
    pub view: GameSessionView,
    /// Definition of the current scene.
    pub scene: SceneDefinition,
}

impl SessionSnapshot {
    /// Captures a session and its current scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the current scene is not
    /// registered.
    pub fn of(session: &GameSession) -> Result<Self, DomainError> {
        Ok(Self {
            view: GameSessionView::of(session),
            scene: session.current_scene()?.clone(),
        })
    }
}

/// Retrieves a session together with its current scene definition.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session and
/// `DomainError::SceneNotFound` if the current scene is not registered.
pub fn get_session_snapshot(
    session_id: Uuid,
    store: &InMemorySessionStore,
) -> Result<SessionSnapshot, DomainError> {
    store.with_session(session_id, |session| SessionSnapshot::of(session))?
}

/// Retrieves the session's stats.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if no session has that id.
pub fn get_stats(session_id: Uuid, store: &InMemorySessionStore) -> Result<StatsView, DomainError> {
    store.with_session(session_id, |session| StatsView::of(session))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use dungeon_core::error::DomainError;
    use uuid::Uuid;

    use crate::application::query_handlers::{get_session_snapshot, get_stats};
    use crate::application::store::InMemorySessionStore;
    use crate::domain::aggregates::GameSession;
    use dungeon_test_support::{FixedClock, builtin_registry};

    fn store_with_session() -> (InMemorySessionStore, Uuid) {
        let store = InMemorySessionStore::new();
        let id = Uuid::new_v4();
        let clock = FixedClock(Utc::now());
        let mut session = GameSession::start(id, builtin_registry(), Uuid::new_v4(), &clock);
        session.choose("go_forward", Uuid::new_v4(), &clock).unwrap();
        store.insert(session);
        (store, id)
    }

    #[test]
    fn test_get_session_snapshot_returns_view_with_state() {
        // Arrange
        let (store, id) = store_with_session();

        // Act
        let view = get_session_snapshot(id, &store).unwrap().view;

        // Assert
        assert_eq!(view.session_id, id);
        assert_eq!(view.current_scene_id.as_str(), "scene2");
        assert_eq!(view.previous_scene_id.as_ref().map(|s| s.as_str()), Some("scene1"));
        assert_eq!(view.stats.points, 100);
        assert_eq!(view.visited, vec!["scene1→scene2", "scene2"]);
        assert_eq!(view.version, 5);
        assert_eq!(view.content_version.len(), 64);
    }

    #[test]
    fn test_get_session_snapshot_pairs_view_with_current_scene() {
        let (store, id) = store_with_session();

        let snapshot = get_session_snapshot(id, &store).unwrap();

        assert_eq!(snapshot.view.current_scene_id, snapshot.scene.id);
        assert_eq!(snapshot.scene.id.as_str(), "scene2");
        assert_eq!(snapshot.scene.choices.len(), 2);
    }

    #[test]
    fn test_get_stats_reports_alive() {
        let (store, id) = store_with_session();

        let stats = get_stats(id, &store).unwrap();

        assert_eq!(stats.hp, 100);
        assert_eq!(stats.points, 100);
        assert!(stats.alive);
    }

    #[test]
    fn test_get_stats_returns_not_found() {
        let store = InMemorySessionStore::new();
        let id = Uuid::new_v4();

        let result = get_stats(id, &store);

        match result {
            Err(DomainError::SessionNotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected SessionNotFound, got {other:?}"),
        }
    }
}
