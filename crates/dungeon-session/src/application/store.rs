//! In-memory storage for running playthroughs.
//!
//! Playthroughs are never persisted. The store holds at most a fixed number
//! of them and evicts the least recently used one to make room.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use dungeon_core::error::DomainError;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::GameSession;

/// Session limit used when none is configured.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Entry {
    session: GameSession,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<Uuid, Entry>,
    tick: u64,
}

impl Sessions {
    fn touch(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn least_recently_used(&self) -> Option<Uuid> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| *id)
    }
}

/// Holds every live session behind a single lock.
///
/// Commands on sessions are short and synchronous, so one lock keeps each
/// session's transitions strictly ordered.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Mutex<Sessions>,
    max_sessions: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    /// Creates an empty store holding up to [`DEFAULT_MAX_SESSIONS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SESSIONS)
    }

    /// Creates an empty store holding up to `max_sessions` (at least one).
    #[must_use]
    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        // Sessions stay consistent even if a holder panicked: every mutation
        // completes before the guard is released.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a session, replacing any session with the same id.
    ///
    /// When the store is full, the least recently used session is evicted
    /// first and its id returned.
    pub fn insert(&self, session: GameSession) -> Option<Uuid> {
        let mut sessions = self.lock();
        let mut evicted = None;
        if !sessions.entries.contains_key(&session.id) && sessions.entries.len() >= self.max_sessions
        {
            evicted = sessions.least_recently_used();
            if let Some(id) = evicted {
                sessions.entries.remove(&id);
                info!(session_id = %id, max_sessions = self.max_sessions, "evicted idle session");
            }
        }
        let last_used = sessions.touch();
        sessions.entries.insert(session.id, Entry { session, last_used });
        evicted
    }

    /// Runs `f` against the session with the given id and marks it used.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` if no such session exists.
    pub fn with_session<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Result<R, DomainError> {
        let mut sessions = self.lock();
        let last_used = sessions.touch();
        let entry = sessions
            .entries
            .get_mut(&session_id)
            .ok_or(DomainError::SessionNotFound(session_id))?;
        entry.last_used = last_used;
        Ok(f(&mut entry.session))
    }

    /// Drops a session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` if no such session exists.
    pub fn remove(&self, session_id: Uuid) -> Result<GameSession, DomainError> {
        self.lock()
            .entries
            .remove(&session_id)
            .map(|entry| entry.session)
            .ok_or(DomainError::SessionNotFound(session_id))
    }

    /// Maximum number of sessions held at once.
    #[must_use]
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
