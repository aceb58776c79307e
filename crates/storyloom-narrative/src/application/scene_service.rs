//! Scene Generation Service.
//!
//! Sequences one generation cycle: narrative first, then the illustration
//! derived from the narrative's image prompt. The illustration call is never
//! issued when the narrative call fails, and a scene without its illustration
//! is never returned.

use std::time::Duration;

use storyloom_core::error::GenerationError;
use tracing::{info, instrument};

use super::illustration_client::IllustrationClient;
use super::narrative_client::NarrativeClient;
use crate::domain::prompts::{continuation_prompt, opening_prompt};
use crate::domain::scene::{NextScene, Scene};

/// Produces the next scene for a session, opening or continuation.
#[derive(Debug, Clone)]
pub struct SceneGenerationService {
    narrative: NarrativeClient,
    illustration: IllustrationClient,
}

impl SceneGenerationService {
    /// Composes the two clients.
    #[must_use]
    pub fn new(narrative: NarrativeClient, illustration: IllustrationClient) -> Self {
        Self {
            narrative,
            illustration,
        }
    }

    /// Applies one timeout to both external calls.
    #[must_use]
    pub fn with_call_timeout(self, timeout: Duration) -> Self {
        Self {
            narrative: self.narrative.with_timeout(timeout),
            illustration: self.illustration.with_timeout(timeout),
        }
    }

    /// Produces the opening scene for `premise`.
    ///
    /// # Errors
    ///
    /// Returns the first `GenerationError` raised by either stage.
    #[instrument(skip(self))]
    pub async fn produce_opening(&self, premise: &str) -> Result<NextScene, GenerationError> {
        self.produce(&opening_prompt(premise)).await
    }

    /// Produces the scene that follows `choice`, given the joined story so far.
    ///
    /// # Errors
    ///
    /// Returns the first `GenerationError` raised by either stage.
    #[instrument(skip(self, story_context), fields(context_len = story_context.len()))]
    pub async fn produce_continuation(
        &self,
        story_context: &str,
        choice: &str,
    ) -> Result<NextScene, GenerationError> {
        self.produce(&continuation_prompt(story_context, choice)).await
    }

    async fn produce(&self, directive: &str) -> Result<NextScene, GenerationError> {
        let result = self.narrative.generate(directive).await?;
        let image = self.illustration.illustrate(&result.image_prompt).await?;

        info!(choices = result.choices.len(), "scene produced");

        Ok(NextScene {
            scene: Scene {
                text: result.scene_description,
                image,
            },
            choices: result.choices,
        })
    }
}
