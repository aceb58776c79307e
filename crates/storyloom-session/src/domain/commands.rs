//! Commands for the Session context.

use storyloom_core::command::Command;
use uuid::Uuid;

/// Command to begin a story from a premise.
#[derive(Debug, Clone)]
pub struct StartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to start.
    pub session_id: Uuid,
    /// The user's premise.
    pub premise: String,
}

impl Command for StartStory {
    fn command_type(&self) -> &'static str {
        "session.start_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Uuid {
        self.session_id
    }
}

/// Command to continue the story with a chosen action.
#[derive(Debug, Clone)]
pub struct ChooseAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to advance.
    pub session_id: Uuid,
    /// The chosen action.
    pub choice: String,
}

impl Command for ChooseAction {
    fn command_type(&self) -> &'static str {
        "session.choose_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Uuid {
        self.session_id
    }
}

/// Command to discard the story and return to idle.
#[derive(Debug, Clone)]
pub struct RestartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to reset.
    pub session_id: Uuid,
}

impl Command for RestartStory {
    fn command_type(&self) -> &'static str {
        "session.restart_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Uuid {
        self.session_id
    }
}
