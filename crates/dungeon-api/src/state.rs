//! Shared application state.

use std::sync::Arc;

use dungeon_content::application::loader;
use dungeon_content::domain::presentation::PresentationTable;
use dungeon_content::domain::registry::SceneRegistry;
use dungeon_core::clock::Clock;
use dungeon_session::application::store::InMemorySessionStore;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::AppError;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Validated scene table.
    pub registry: Arc<SceneRegistry>,
    /// Display data for each scene.
    pub presentation: Arc<PresentationTable>,
    /// Clock for event timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Live playthroughs.
    pub sessions: Arc<InMemorySessionStore>,
}

impl AppState {
    /// Create new application state with an empty session store.
    #[must_use]
    pub fn new(
        registry: Arc<SceneRegistry>,
        presentation: Arc<PresentationTable>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            registry,
            presentation,
            clock,
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }

    /// Replaces the session store with an empty one holding at most
    /// `max_sessions` playthroughs.
    #[must_use]
    pub fn with_session_limit(mut self, max_sessions: usize) -> Self {
        self.sessions = Arc::new(InMemorySessionStore::with_limit(max_sessions));
        self
    }

    /// Loads content as configured and builds the state around it.
    ///
    /// Custom scenes without a custom presentation table get an empty table,
    /// so their buttons show raw action ids.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Content` if either table fails to load or validate.
    pub fn load(config: &ServerConfig, clock: Arc<dyn Clock + Send + Sync>) -> Result<Self, AppError> {
        let registry = match &config.scenes_path {
            Some(path) => loader::load_registry_file(path)?,
            None => loader::builtin_registry()?,
        };
        let presentation = match (&config.presentation_path, &config.scenes_path) {
            (Some(path), _) => loader::load_presentation_file(path, &registry)?,
            (None, None) => loader::builtin_presentation(&registry)?,
            (None, Some(_)) => PresentationTable::default(),
        };

        info!(
            content_version = registry.version_hash(),
            scenes = registry.len(),
            styled_scenes = presentation.len(),
            max_sessions = config.max_sessions,
            "content loaded"
        );

        Ok(Self::new(Arc::new(registry), Arc::new(presentation), clock)
            .with_session_limit(config.max_sessions))
    }
}
