//! Shared application state.

use std::sync::Arc;

use storyloom_core::clock::Clock;
use storyloom_narrative::application::scene_service::SceneGenerationService;
use storyloom_session::store::SessionStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to stamp session transitions.
    pub clock: Arc<dyn Clock>,
    /// Live sessions.
    pub sessions: Arc<SessionStore>,
    /// Scene generation pipeline.
    pub scenes: SceneGenerationService,
}

impl AppState {
    /// Create new application state with an empty session store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, scenes: SceneGenerationService) -> Self {
        Self {
            clock,
            sessions: Arc::new(SessionStore::new()),
            scenes,
        }
    }
}
