//! In-process session store.
//!
//! Sessions live only as long as the process. Every read or mutation takes
//! the lock briefly and never across an `.await`, so a session in the middle
//! of a generation cycle stays observable as `Generating`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use uuid::Uuid;

use crate::domain::aggregates::Session;

/// Keyed collection of independent sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and stores a new idle session, returning a snapshot of it.
    pub fn create(&self, clock: &dyn Clock) -> Session {
        let session = Session::new(Uuid::new_v4(), clock);
        self.lock().insert(session.id, session.clone());
        session
    }

    /// Returns a snapshot of the session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` if no session has this ID.
    pub fn get(&self, session_id: Uuid) -> Result<Session, DomainError> {
        self.lock()
            .get(&session_id)
            .cloned()
            .ok_or(DomainError::SessionNotFound(session_id))
    }

    /// Runs `mutate` against the session under the lock.
    ///
    /// The closure sees the session exclusively; when it returns an error the
    /// closure is expected to have left the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` if no session has this ID, or
    /// whatever `mutate` returns.
    pub fn update<T>(
        &self,
        session_id: Uuid,
        mutate: impl FnOnce(&mut Session) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(DomainError::SessionNotFound(session_id))?;
        mutate(session)
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        // Session transitions never panic midway, so poisoned data is still consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
