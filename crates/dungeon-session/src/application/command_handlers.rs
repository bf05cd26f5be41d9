//! Command handlers for playthroughs.
//!
//! Each handler locates the session, runs the domain operation, then drains
//! the recorded events and snapshots the session before releasing the lock.

use std::sync::Arc;

use dungeon_content::domain::registry::SceneRegistry;
use dungeon_core::aggregate::AggregateRoot;
use dungeon_core::clock::Clock;
use dungeon_core::command::Command;
use dungeon_core::error::DomainError;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::query_handlers::SessionSnapshot;
use crate::application::store::InMemorySessionStore;
use crate::domain::aggregates::{ChoiceResult, GameSession};
use crate::domain::commands::{Choose, EndSession, RestartSession, StartSession};
use crate::domain::events::GameEvent;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct SessionCommandResult {
    /// The session affected by the command.
    pub session_id: Uuid,
    /// The session and its scene as left by the command.
    pub snapshot: SessionSnapshot,
    /// Events recorded while handling the command.
    pub events: Vec<GameEvent>,
}

impl SessionCommandResult {
    fn drain(session: &mut GameSession) -> Result<Self, DomainError> {
        Ok(Self {
            session_id: session.id,
            snapshot: SessionSnapshot::of(session)?,
            events: session.take_uncommitted_events(),
        })
    }
}

/// Result of a successfully handled `Choose` command.
#[derive(Debug)]
pub struct ChooseCommandResult {
    /// What the choice did.
    pub outcome: ChoiceResult,
    /// The session state after the choice.
    pub session: SessionCommandResult,
}

fn trace_command(command: &impl Command) {
    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        session_id = ?command.session_id(),
        "dispatching command"
    );
}

/// Handles the `StartSession` command: creates a playthrough and stores it.
///
/// This is a creation command: the handler generates the `session_id`.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` if the start scene is not registered.
pub fn handle_start_session(
    command: &StartSession,
    registry: &Arc<SceneRegistry>,
    clock: &dyn Clock,
    store: &InMemorySessionStore,
) -> Result<SessionCommandResult, DomainError> {
    trace_command(command);
    let mut session = GameSession::start(
        Uuid::new_v4(),
        Arc::clone(registry),
        command.correlation_id,
        clock,
    );
    let result = SessionCommandResult::drain(&mut session)?;
    store.insert(session);
    Ok(result)
}

/// Handles the `Choose` command.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session, otherwise
/// whatever [`GameSession::choose`] returns. The session is unchanged on
/// error.
pub fn handle_choose(
    command: &Choose,
    clock: &dyn Clock,
    store: &InMemorySessionStore,
) -> Result<ChooseCommandResult, DomainError> {
    trace_command(command);
    store.with_session(command.session_id, |session| {
        let outcome = session.choose(&command.action_id, command.correlation_id, clock)?;
        Ok(ChooseCommandResult {
            outcome,
            session: SessionCommandResult::drain(session)?,
        })
    })?
}

/// Handles the `RestartSession` command.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session.
pub fn handle_restart(
    command: &RestartSession,
    clock: &dyn Clock,
    store: &InMemorySessionStore,
) -> Result<SessionCommandResult, DomainError> {
    trace_command(command);
    store.with_session(command.session_id, |session| {
        session.restart(command.correlation_id, clock);
        SessionCommandResult::drain(session)
    })?
}

/// Handles the `EndSession` command: drops the playthrough from the store.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session.
pub fn handle_end_session(
    command: &EndSession,
    store: &InMemorySessionStore,
) -> Result<(), DomainError> {
    trace_command(command);
    let session = store.remove(command.session_id)?;
    info!(
        session_id = %session.id,
        version = session.version(),
        "session ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use dungeon_core::error::DomainError;
    use dungeon_core::event::DomainEvent;
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_choose, handle_end_session, handle_restart, handle_start_session,
    };
    use crate::application::store::InMemorySessionStore;
    use crate::domain::aggregates::ChoiceResult;
    use crate::domain::commands::{Choose, EndSession, RestartSession, StartSession};
    use dungeon_test_support::{FixedClock, builtin_registry};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn choose(session_id: Uuid, action_id: &str) -> Choose {
        Choose {
            correlation_id: Uuid::new_v4(),
            session_id,
            action_id: action_id.to_owned(),
        }
    }

    #[test]
    fn test_handle_start_session_stores_session_and_returns_events() {
        // Arrange
        let store = InMemorySessionStore::new();
        let correlation_id = Uuid::new_v4();
        let command = StartSession { correlation_id };

        // Act
        let result = handle_start_session(&command, &builtin_registry(), &clock(), &store).unwrap();

        // Assert
        assert_eq!(store.len(), 1);
        assert_eq!(result.snapshot.scene.id.as_str(), "scene1");
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].event_type(), "session.started");
        assert!(
            result
                .events
                .iter()
                .all(|e| e.metadata().correlation_id == correlation_id)
        );
    }

    #[test]
    fn test_handle_choose_drains_events() {
        // Arrange
        let store = InMemorySessionStore::new();
        let started = handle_start_session(
            &StartSession {
                correlation_id: Uuid::new_v4(),
            },
            &builtin_registry(),
            &clock(),
            &store,
        )
        .unwrap();

        // Act
        let first = handle_choose(&choose(started.session_id, "go_forward"), &clock(), &store).unwrap();
        let second =
            handle_choose(&choose(started.session_id, "go_back_scene2"), &clock(), &store).unwrap();

        // Assert
        assert!(matches!(first.outcome, ChoiceResult::Moved { .. }));
        assert_eq!(first.session.events.len(), 3);
        assert_eq!(first.session.events[0].metadata().sequence_number, 3);
        assert_eq!(second.session.events[0].metadata().sequence_number, 6);
        assert_eq!(second.session.events[0].event_type(), "session.points_adjusted");
    }

    #[test]
    fn test_handle_choose_unknown_action_returns_error() {
        let store = InMemorySessionStore::new();
        let started = handle_start_session(
            &StartSession {
                correlation_id: Uuid::new_v4(),
            },
            &builtin_registry(),
            &clock(),
            &store,
        )
        .unwrap();

        let result = handle_choose(&choose(started.session_id, "fly"), &clock(), &store);

        assert!(matches!(result, Err(DomainError::UnknownAction { .. })));
    }

    #[test]
    fn test_handle_choose_unknown_session_returns_not_found() {
        let store = InMemorySessionStore::new();
        let session_id = Uuid::new_v4();

        let result = handle_choose(&choose(session_id, "go_forward"), &clock(), &store);

        match result {
            Err(DomainError::SessionNotFound(id)) => assert_eq!(id, session_id),
            other => panic!("expected SessionNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_handle_restart_records_restart_event() {
        // Arrange
        let store = InMemorySessionStore::new();
        let started = handle_start_session(
            &StartSession {
                correlation_id: Uuid::new_v4(),
            },
            &builtin_registry(),
            &clock(),
            &store,
        )
        .unwrap();
        handle_choose(&choose(started.session_id, "go_forward"), &clock(), &store).unwrap();

        // Act
        let result = handle_restart(
            &RestartSession {
                correlation_id: Uuid::new_v4(),
                session_id: started.session_id,
            },
            &clock(),
            &store,
        )
        .unwrap();

        // Assert
        let types: Vec<&str> = result.events.iter().map(DomainEvent::event_type).collect();
        assert_eq!(
            types,
            vec!["session.restarted", "session.scene_entered", "session.stats_changed"]
        );
    }

    #[test]
    fn test_handle_choose_snapshot_matches_outcome() {
        // Arrange
        let store = InMemorySessionStore::new();
        let started = handle_start_session(
            &StartSession {
                correlation_id: Uuid::new_v4(),
            },
            &builtin_registry(),
            &clock(),
            &store,
        )
        .unwrap();
        let id = started.session_id;

        // Act
        let first = handle_choose(&choose(id, "go_forward"), &clock(), &store).unwrap();
        handle_choose(&choose(id, "go_forward_scene2"), &clock(), &store).unwrap();

        // Assert
        let ChoiceResult::Moved { to, .. } = &first.outcome else {
            panic!("expected Moved, got {:?}", first.outcome);
        };
        let snapshot = &first.session.snapshot;
        assert_eq!(&snapshot.view.current_scene_id, to);
        assert_eq!(snapshot.scene.id, snapshot.view.current_scene_id);
        assert_eq!(snapshot.view.stats.points, 100);
        assert_eq!(snapshot.view.version, 5);
    }

    #[test]
    fn test_handle_end_session_removes_session() {
        // Arrange
        let store = InMemorySessionStore::new();
        let started = handle_start_session(
            &StartSession {
                correlation_id: Uuid::new_v4(),
            },
            &builtin_registry(),
            &clock(),
            &store,
        )
        .unwrap();
        let end = EndSession {
            correlation_id: Uuid::new_v4(),
            session_id: started.session_id,
        };

        // Act
        handle_end_session(&end, &store).unwrap();

        // Assert
        assert!(store.is_empty());
        assert_eq!(
            handle_end_session(&end, &store),
            Err(DomainError::SessionNotFound(started.session_id))
        );
        assert!(matches!(
            handle_choose(&choose(started.session_id, "go_forward"), &clock(), &store),
            Err(DomainError::SessionNotFound(_))
        ));
    }
}
