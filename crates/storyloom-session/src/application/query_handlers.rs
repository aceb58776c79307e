//! Query handlers for the Session context.
//!
//! Read-only view DTOs for the presentation boundary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storyloom_core::error::DomainError;
use storyloom_narrative::domain::scene::Scene;
use uuid::Uuid;

use crate::domain::aggregates::{Session, SessionStatus};
use crate::store::SessionStore;

/// Read-only view of a session aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// The scene on display, if any.
    pub current_scene: Option<Scene>,
    /// Choices offered for the current scene.
    pub choices: Vec<String>,
    /// Failure description, present only when failed.
    pub error_message: Option<String>,
    /// Number of committed scenes.
    pub scene_count: usize,
    /// Every committed scene, oldest first.
    pub history: Vec<Scene>,
    /// Number of transitions applied.
    pub version: i64,
    /// Time of the last transition.
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            status: session.status(),
            current_scene: session.current_scene().cloned(),
            choices: session.choices().to_vec(),
            error_message: session.error_message().map(str::to_owned),
            scene_count: session.history().len(),
            history: session.history().to_vec(),
            version: session.version(),
            updated_at: session.updated_at(),
        }
    }
}

/// Retrieves a session by its ID.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if no session has this ID.
pub fn get_session_by_id(
    session_id: Uuid,
    store: &SessionStore,
) -> Result<SessionView, DomainError> {
    let session = store.get(session_id)?;
    Ok(SessionView::from(&session))
}
