//! Command handlers for the Session context.
//!
//! Each generating handler runs the same three steps: begin the transition
//! under the store lock, run the generation cycle with the lock released,
//! then commit the outcome under the lock again. This is the only place a
//! `GenerationError` becomes session state.

use std::sync::Arc;

use storyloom_core::clock::Clock;
use storyloom_core::command::Command;
use storyloom_core::error::{DomainError, GenerationError};
use storyloom_narrative::application::scene_service::SceneGenerationService;
use storyloom_narrative::domain::scene::NextScene;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::{Completion, PendingGeneration, Session};
use crate::domain::commands::{ChooseAction, RestartStory, StartStory};
use crate::store::SessionStore;

/// Creates a new idle session.
#[instrument(skip_all)]
pub fn handle_create_session(clock: &dyn Clock, store: &SessionStore) -> Session {
    let session = store.create(clock);
    info!(session_id = %session.id, "session created");
    session
}

/// Handles the `StartStory` command: enters `Generating`, produces the opening
/// scene, and commits it or the failure.
///
/// # Errors
///
/// Returns `DomainError` if the session does not exist or refuses the intent.
/// A failed generation is not an error here: it is committed as the `Failed`
/// status and the resulting session is returned.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        session_id = %command.session_id,
        correlation_id = %command.correlation_id
    )
)]
pub async fn handle_start_story(
    command: &StartStory,
    clock: &Arc<dyn Clock>,
    store: &Arc<SessionStore>,
    scenes: &SceneGenerationService,
) -> Result<Session, DomainError> {
    let pending = store.update(command.session_id, |session| {
        session.begin_start(&command.premise, clock.as_ref())
    })?;

    run_generation_cycle(command.session_id, pending, clock, store, scenes).await
}

/// Handles the `ChooseAction` command: enters `Generating`, produces the next
/// scene from the full story so far, and commits it or the failure.
///
/// # Errors
///
/// Returns `DomainError` if the session does not exist or refuses the intent.
/// A failed generation is committed as the `Failed` status, not returned.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        session_id = %command.session_id,
        correlation_id = %command.correlation_id
    )
)]
pub async fn handle_choose_action(
    command: &ChooseAction,
    clock: &Arc<dyn Clock>,
    store: &Arc<SessionStore>,
    scenes: &SceneGenerationService,
) -> Result<Session, DomainError> {
    let pending = store.update(command.session_id, |session| {
        session.begin_advance(&command.choice, clock.as_ref())
    })?;

    run_generation_cycle(command.session_id, pending, clock, store, scenes).await
}

/// Handles the `RestartStory` command: resets the session to idle.
///
/// Accepted while a cycle is in flight; that cycle's outcome is discarded
/// when it arrives.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        session_id = %command.session_id,
        correlation_id = %command.correlation_id
    )
)]
pub fn handle_restart_story(
    command: &RestartStory,
    clock: &dyn Clock,
    store: &SessionStore,
) -> Result<Session, DomainError> {
    let session = store.update(command.session_id, |session| {
        session.restart(clock);
        Ok(session.clone())
    })?;
    info!("session restarted");
    Ok(session)
}

/// Runs the two-stage generation for `pending` and commits the outcome.
///
/// The cycle runs on its own task so that a dropped caller cannot strand the
/// session in `Generating`.
async fn run_generation_cycle(
    session_id: Uuid,
    pending: PendingGeneration,
    clock: &Arc<dyn Clock>,
    store: &Arc<SessionStore>,
    scenes: &SceneGenerationService,
) -> Result<Session, DomainError> {
    let task = tokio::spawn({
        let pending = pending.clone();
        let clock = Arc::clone(clock);
        let store = Arc::clone(store);
        let scenes = scenes.clone();
        async move {
            let outcome = match &pending {
                PendingGeneration::Opening { premise, .. } => {
                    scenes.produce_opening(premise).await
                }
                PendingGeneration::Continuation {
                    story_context,
                    choice,
                    ..
                } => scenes.produce_continuation(story_context, choice).await,
            };
            commit(session_id, &pending, outcome, clock.as_ref(), &store)
        }
    });

    match task.await {
        Ok(result) => result,
        Err(join_error) => {
            error!(error = %join_error, "generation task aborted");
            let outcome = Err(GenerationError::Transport("generation was interrupted".into()));
            commit(session_id, &pending, outcome, clock.as_ref(), store)
        }
    }
}

fn commit(
    session_id: Uuid,
    pending: &PendingGeneration,
    outcome: Result<NextScene, GenerationError>,
    clock: &dyn Clock,
    store: &SessionStore,
) -> Result<Session, DomainError> {
    match &outcome {
        Ok(next) => info!(choices = next.choices.len(), "scene generated"),
        Err(e) => warn!(error = ?e, "generation failed"),
    }

    store.update(session_id, |session| {
        if session.complete(pending, outcome, clock)? == Completion::Discarded {
            info!(cycle = pending.cycle(), "session was restarted; outcome discarded");
        }
        Ok(session.clone())
    })
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;
    use std::task::Poll;

    use async_trait::async_trait;
    use storyloom_core::generation::{TextGenerationRequest, TextGenerator};
    use storyloom_narrative::application::illustration_client::IllustrationClient;
    use storyloom_narrative::application::narrative_client::NarrativeClient;
    use storyloom_test_support::{
        EmptyImageGenerator, FixedClock, RecordingImageGenerator, ScriptedTextGenerator,
        narrative_json,
    };
    use tokio::sync::Notify;

    use super::*;
    use crate::domain::aggregates::SessionStatus;

    /// Holds every reply until `release` is called.
    struct GatedTextGenerator {
        gate: Notify,
        reply: String,
    }

    impl GatedTextGenerator {
        fn new(reply: String) -> Self {
            Self {
                gate: Notify::new(),
                reply,
            }
        }

        fn release(&self) {
            self.gate.notify_one();
        }
    }

    #[async_trait]
    impl TextGenerator for GatedTextGenerator {
        async fn generate_text(
            &self,
            _request: &TextGenerationRequest,
        ) -> Result<String, GenerationError> {
            self.gate.notified().await;
            Ok(self.reply.clone())
        }
    }

    async fn wait_for_status(store: &SessionStore, session_id: Uuid, status: SessionStatus) {
        for _ in 0..100 {
            if store.get(session_id).unwrap().status() == status {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("session never reached {status:?}");
    }

    struct Harness {
        clock: Arc<dyn Clock>,
        store: Arc<SessionStore>,
        text: Arc<ScriptedTextGenerator>,
    }

    impl Harness {
        fn new(responses: &[String]) -> Self {
            Self {
                clock: Arc::new(FixedClock::default()),
                store: Arc::new(SessionStore::new()),
                text: Arc::new(ScriptedTextGenerator::replying(responses)),
            }
        }

        fn scenes(&self) -> SceneGenerationService {
            SceneGenerationService::new(
                NarrativeClient::new(self.text.clone()),
                IllustrationClient::new(Arc::new(RecordingImageGenerator::new())),
            )
        }

        fn session(&self) -> Uuid {
            handle_create_session(self.clock.as_ref(), &self.store).id
        }

        async fn start(&self, session_id: Uuid, premise: &str) -> Result<Session, DomainError> {
            let command = StartStory {
                correlation_id: Uuid::new_v4(),
                session_id,
                premise: premise.to_owned(),
            };
            handle_start_story(&command, &self.clock, &self.store, &self.scenes()).await
        }

        async fn choose(&self, session_id: Uuid, choice: &str) -> Result<Session, DomainError> {
            let command = ChooseAction {
                correlation_id: Uuid::new_v4(),
                session_id,
                choice: choice.to_owned(),
            };
            handle_choose_action(&command, &self.clock, &self.store, &self.scenes()).await
        }
    }

    fn opening() -> String {
        narrative_json(
            "Emergency lights pulse along the corridor.",
            "a derelict spaceship corridor",
            &["Head to the bridge", "Search the crew quarters", "Check the escape pods"],
        )
    }

    fn continuation() -> String {
        narrative_json(
            "The bridge is silent, the captain's chair empty.",
            "an abandoned starship bridge",
            &["Read the log", "Power the console", "Return to the corridor", "Call out"],
        )
    }

    #[tokio::test]
    async fn test_start_then_advance_builds_history() {
        // Arrange
        let harness = Harness::new(&[opening(), continuation()]);
        let session_id = harness.session();

        // Act
        let started = harness.start(session_id, "a derelict spaceship").await.unwrap();
        let first_choice = started.choices()[0].clone();
        let advanced = harness.choose(session_id, &first_choice).await.unwrap();

        // Assert
        assert_eq!(started.status(), SessionStatus::Active);
        assert_eq!(started.history().len(), 1);
        assert!((3..=4).contains(&started.choices().len()));

        assert_eq!(advanced.status(), SessionStatus::Active);
        assert_eq!(advanced.history().len(), 2);
        assert_eq!(advanced.history()[0], started.history()[0]);
        assert_eq!(advanced.current_scene(), advanced.history().get(1));
        assert_eq!(advanced.choices().len(), 4);

        let requests = harness.text.requests();
        assert!(requests[1].prompt.contains("Emergency lights pulse along the corridor."));
        assert!(requests[1].prompt.contains("\"Head to the bridge\""));

        assert_eq!(harness.store.get(session_id).unwrap(), advanced);
    }

    #[tokio::test]
    async fn test_start_with_malformed_narrative_fails_session() {
        // Arrange
        let harness = Harness::new(&["I'm sorry, I can't do JSON today.".to_owned()]);
        let session_id = harness.session();

        // Act
        let session = harness.start(session_id, "a derelict spaceship").await.unwrap();

        // Assert
        assert_eq!(session.status(), SessionStatus::Failed);
        assert!(session.history().is_empty());
        assert!(!session.error_message().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_advance_without_illustration_keeps_history_length() {
        // Arrange
        let harness = Harness::new(&[opening()]);
        let session_id = harness.session();
        harness.start(session_id, "a derelict spaceship").await.unwrap();
        let text = Arc::new(ScriptedTextGenerator::replying(&[continuation()]));
        let scenes = SceneGenerationService::new(
            NarrativeClient::new(text),
            IllustrationClient::new(Arc::new(EmptyImageGenerator)),
        );
        let command = ChooseAction {
            correlation_id: Uuid::new_v4(),
            session_id,
            choice: "Head to the bridge".to_owned(),
        };

        // Act
        let session = handle_choose_action(&command, &harness.clock, &harness.store, &scenes)
            .await
            .unwrap();

        // Assert
        assert_eq!(session.status(), SessionStatus::Failed);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.choices().len(), 3);
        assert!(session.error_message().unwrap().contains("Image generation failed"));
    }

    #[tokio::test]
    async fn test_start_on_unknown_session_returns_not_found() {
        let harness = Harness::new(&[]);

        let result = harness.start(Uuid::new_v4(), "a derelict spaceship").await;

        assert!(matches!(result, Err(DomainError::SessionNotFound(_))));
        assert!(harness.text.requests().is_empty());
    }

    #[tokio::test]
    async fn test_blank_premise_is_rejected_before_generation() {
        let harness = Harness::new(&[opening()]);
        let session_id = harness.session();

        let result = harness.start(session_id, " \t ").await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(harness.text.requests().is_empty());
        assert_eq!(
            harness.store.get(session_id).unwrap().status(),
            SessionStatus::Idle
        );
    }

    #[tokio::test]
    async fn test_advance_on_idle_session_is_rejected() {
        let harness = Harness::new(&[continuation()]);
        let session_id = harness.session();

        let result = harness.choose(session_id, "Head to the bridge").await;

        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        assert!(harness.text.requests().is_empty());
    }

    #[tokio::test]
    async fn test_restart_after_failure_returns_to_idle() {
        // Arrange
        let harness = Harness::new(&["garbage".to_owned()]);
        let session_id = harness.session();
        harness.start(session_id, "a derelict spaceship").await.unwrap();
        let command = RestartStory {
            correlation_id: Uuid::new_v4(),
            session_id,
        };

        // Act
        let session =
            handle_restart_story(&command, harness.clock.as_ref(), &harness.store).unwrap();

        // Assert
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.history().is_empty());
        assert!(session.choices().is_empty());
        assert!(session.error_message().is_none());
    }

    #[tokio::test]
    async fn test_restart_during_cycle_leaves_session_idle_after_cycle_ends() {
        // Arrange
        let harness = Harness::new(&[]);
        let session_id = harness.session();
        let text = Arc::new(GatedTextGenerator::new(opening()));
        let scenes = SceneGenerationService::new(
            NarrativeClient::new(text.clone()),
            IllustrationClient::new(Arc::new(RecordingImageGenerator::new())),
        );
        let start = tokio::spawn({
            let clock = Arc::clone(&harness.clock);
            let store = Arc::clone(&harness.store);
            let command = StartStory {
                correlation_id: Uuid::new_v4(),
                session_id,
                premise: "a derelict spaceship".to_owned(),
            };
            async move { handle_start_story(&command, &clock, &store, &scenes).await }
        });
        wait_for_status(&harness.store, session_id, SessionStatus::Generating).await;

        // Act
        let restarted = handle_restart_story(
            &RestartStory {
                correlation_id: Uuid::new_v4(),
                session_id,
            },
            harness.clock.as_ref(),
            &harness.store,
        )
        .unwrap();
        text.release();
        let finished = start.await.unwrap().unwrap();

        // Assert
        assert_eq!(restarted.status(), SessionStatus::Idle);
        assert_eq!(finished.status(), SessionStatus::Idle);
        assert!(finished.history().is_empty());
        assert!(finished.choices().is_empty());
        assert_eq!(harness.store.get(session_id).unwrap(), restarted);
    }

    #[tokio::test]
    async fn test_cycle_commits_after_caller_is_dropped() {
        // Arrange
        let harness = Harness::new(&[opening()]);
        let session_id = harness.session();
        let scenes = harness.scenes();
        let command = StartStory {
            correlation_id: Uuid::new_v4(),
            session_id,
            premise: "a derelict spaceship".to_owned(),
        };

        // Act
        {
            let mut call = pin!(handle_start_story(
                &command,
                &harness.clock,
                &harness.store,
                &scenes
            ));
            poll_fn(|cx| {
                assert!(call.as_mut().poll(cx).is_pending());
                Poll::Ready(())
            })
            .await;
        }
        wait_for_status(&harness.store, session_id, SessionStatus::Active).await;

        // Assert
        let session = harness.store.get(session_id).unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.choices().len(), 3);
    }
}
