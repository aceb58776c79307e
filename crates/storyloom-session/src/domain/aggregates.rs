//! Aggregate root for the Session context.
//!
//! Every mutation is split in two. `begin_start` / `begin_advance` validate
//! the intent, move the session to `Generating`, and hand back a
//! [`PendingGeneration`] describing the cycle to run. `complete` then commits
//! either the new scene or the failure. Between the two calls the session is
//! observable as `Generating` and refuses every intent except `restart`.
//!
//! Each cycle is stamped with a number. `restart` moves the counter on, so an
//! outcome that arrives for a superseded cycle is dropped instead of landing
//! on the reset session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyloom_core::clock::Clock;
use storyloom_core::error::{DomainError, GenerationError};
use storyloom_narrative::domain::scene::{NextScene, Scene, join_story_context};
use tracing::{debug, warn};
use uuid::Uuid;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No story yet.
    Idle,
    /// A generation cycle is in flight.
    Generating,
    /// A scene is on display and choices are available.
    Active,
    /// The last generation cycle failed.
    Failed,
}

impl SessionStatus {
    /// Returns the lowercase status name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Active => "active",
            Self::Failed => "failed",
        }
    }
}

/// The generation cycle a session is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingGeneration {
    /// First scene of a new story.
    Opening {
        /// Cycle number assigned when generation began.
        cycle: u64,
        /// Trimmed premise.
        premise: String,
    },
    /// Scene following a chosen action.
    Continuation {
        /// Cycle number assigned when generation began.
        cycle: u64,
        /// Every prior scene's text, joined in order.
        story_context: String,
        /// The action the player chose.
        choice: String,
    },
}

impl PendingGeneration {
    /// The cycle this generation belongs to.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        match self {
            Self::Opening { cycle, .. } | Self::Continuation { cycle, .. } => *cycle,
        }
    }
}

/// What `Session::complete` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The scene or the failure was applied.
    Committed,
    /// The cycle had been superseded by a restart; nothing changed.
    Discarded,
}

/// The aggregate root for one interactive story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Number of transitions applied.
    pub(crate) version: i64,
    pub(crate) status: SessionStatus,
    /// Committed scenes, oldest first. Append-only while a story runs.
    pub(crate) history: Vec<Scene>,
    pub(crate) choices: Vec<String>,
    pub(crate) error_message: Option<String>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) cycle: u64,
}

impl Session {
    /// Creates a new idle session.
    #[must_use]
    pub fn new(id: Uuid, clock: &dyn Clock) -> Self {
        Self {
            id,
            version: 0,
            status: SessionStatus::Idle,
            history: Vec::new(),
            choices: Vec::new(),
            error_message: None,
            updated_at: clock.now(),
            cycle: 0,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Every committed scene, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Scene] {
        &self.history
    }

    /// The scene on display: always the last entry of the history.
    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.history.last()
    }

    /// Choices offered for the current scene.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Failure description, present only while `Failed`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Number of transitions applied.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Time of the last transition.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Begins a new story from `premise`.
    ///
    /// Accepted from `Idle`, and from `Failed` as an implicit restart. The
    /// previous history stays in place until the opening scene commits, so a
    /// failed start leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionBusy` while generating,
    /// `DomainError::InvalidTransition` from `Active`, and
    /// `DomainError::Validation` for a blank premise. State is unchanged in
    /// every error case.
    pub fn begin_start(
        &mut self,
        premise: &str,
        clock: &dyn Clock,
    ) -> Result<PendingGeneration, DomainError> {
        match self.status {
            SessionStatus::Generating => return Err(DomainError::SessionBusy(self.id)),
            SessionStatus::Active => return Err(self.invalid("start")),
            SessionStatus::Idle | SessionStatus::Failed => {}
        }

        let premise = premise.trim();
        if premise.is_empty() {
            return Err(DomainError::Validation("premise must not be empty".into()));
        }

        let cycle = self.enter_generating(clock);
        Ok(PendingGeneration::Opening {
            cycle,
            premise: premise.to_owned(),
        })
    }

    /// Begins the cycle that follows `choice`.
    ///
    /// Any string is accepted; a choice outside the offered set is logged and
    /// still sent to the generator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionBusy` while generating and
    /// `DomainError::InvalidTransition` from any status other than `Active`.
    /// State is unchanged in every error case.
    pub fn begin_advance(
        &mut self,
        choice: &str,
        clock: &dyn Clock,
    ) -> Result<PendingGeneration, DomainError> {
        match self.status {
            SessionStatus::Generating => return Err(DomainError::SessionBusy(self.id)),
            SessionStatus::Active => {}
            SessionStatus::Idle | SessionStatus::Failed => return Err(self.invalid("advance")),
        }

        if !self.choices.iter().any(|offered| offered == choice) {
            warn!(session_id = %self.id, choice, "choice is not among the offered choices");
        }

        let story_context = join_story_context(&self.history);
        let cycle = self.enter_generating(clock);
        Ok(PendingGeneration::Continuation {
            cycle,
            story_context,
            choice: choice.to_owned(),
        })
    }

    /// Commits the outcome of the cycle described by `pending`.
    ///
    /// On success the new scene replaces the history (opening) or is appended
    /// to it (continuation) and the session becomes `Active`. On failure the
    /// session becomes `Failed` with the error's message; history, current
    /// scene, and choices keep their pre-cycle values.
    ///
    /// An outcome for a cycle that a restart has superseded is discarded and
    /// the session is left as it is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the cycle is current but no
    /// longer in flight.
    pub fn complete(
        &mut self,
        pending: &PendingGeneration,
        outcome: Result<NextScene, GenerationError>,
        clock: &dyn Clock,
    ) -> Result<Completion, DomainError> {
        if pending.cycle() != self.cycle {
            debug!(
                session_id = %self.id,
                stale_cycle = pending.cycle(),
                current_cycle = self.cycle,
                "discarding outcome of superseded cycle"
            );
            return Ok(Completion::Discarded);
        }
        if self.status != SessionStatus::Generating {
            return Err(self.invalid("complete"));
        }

        match outcome {
            Ok(next) => {
                match pending {
                    PendingGeneration::Opening { .. } => self.history = vec![next.scene],
                    PendingGeneration::Continuation { .. } => self.history.push(next.scene),
                }
                self.choices = next.choices;
                self.status = SessionStatus::Active;
                self.error_message = None;
            }
            Err(error) => {
                self.status = SessionStatus::Failed;
                self.error_message = Some(error.to_string());
            }
        }

        self.touch(clock);
        Ok(Completion::Committed)
    }

    /// Resets to the initial idle value from any status.
    ///
    /// A cycle still in flight keeps running, but its outcome will be
    /// discarded by `complete`.
    pub fn restart(&mut self, clock: &dyn Clock) {
        if self.status == SessionStatus::Generating {
            debug!(session_id = %self.id, cycle = self.cycle, "restart supersedes in-flight cycle");
        }

        self.cycle += 1;
        self.status = SessionStatus::Idle;
        self.history.clear();
        self.choices.clear();
        self.error_message = None;
        self.touch(clock);
    }

    fn enter_generating(&mut self, clock: &dyn Clock) -> u64 {
        self.cycle += 1;
        self.status = SessionStatus::Generating;
        self.error_message = None;
        self.touch(clock);
        self.cycle
    }

    fn touch(&mut self, clock: &dyn Clock) {
        self.version += 1;
        self.updated_at = clock.now();
    }

    fn invalid(&self, operation: &'static str) -> DomainError {
        DomainError::InvalidTransition {
            operation,
            status: self.status.as_str(),
        }
    }
}
