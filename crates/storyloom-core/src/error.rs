//! Domain error types.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Errors returned to the caller when an intent is rejected.
///
/// A `DomainError` never changes session state: the intent was refused before
/// any transition happened.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No session exists with the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// The intent carried invalid input (e.g. a blank premise).
    #[error("validation error: {0}")]
    Validation(String),

    /// The intent is not valid from the session's current status.
    #[error("cannot {operation} a session that is {status}")]
    InvalidTransition {
        /// The rejected operation.
        operation: &'static str,
        /// The status the session was in.
        status: &'static str,
    },

    /// A generation cycle is already in flight for the session.
    #[error("session {0} is busy generating a scene")]
    SessionBusy(Uuid),
}

/// Failures of a generation cycle.
///
/// These are surfaced to the session boundary, which records them as the
/// `Failed` status and keeps the display text as the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The narrative response did not match the required schema.
    #[error("The story took an unexpected turn. Could not parse the narrative: {0}")]
    Parse(String),

    /// The illustration capability produced no usable image.
    #[error("Image generation failed: {0}")]
    Illustration(String),

    /// Any other failure reaching or talking to an external capability.
    ///
    /// The detail is for logs only; the display text stays generic.
    #[error("The story service is unavailable right now. Please try again.")]
    Transport(String),

    /// An external call did not complete within the configured bound.
    #[error("Generation timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
}
