//! Scene values and story-context assembly.

use serde::{Deserialize, Serialize};

/// Separator placed between consecutive scene texts in the story context.
pub const STORY_CONTEXT_SEPARATOR: &str = "\n---\n";

/// One committed unit of narrative: prose plus its illustration.
///
/// Scenes are immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Narrative prose, never empty.
    pub text: String,
    /// Renderable image reference (a `data:` URL).
    pub image: String,
}

/// The output of one generation cycle: the new scene and the choices offered
/// after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextScene {
    /// The freshly generated scene.
    pub scene: Scene,
    /// Action choices for the player.
    pub choices: Vec<String>,
}

/// Joins the text of every scene, in order, into the context handed to the
/// narrative generator for a continuation.
#[must_use]
pub fn join_story_context(history: &[Scene]) -> String {
    history
        .iter()
        .map(|scene| scene.text.as_str())
        .collect::<Vec<_>>()
        .join(STORY_CONTEXT_SEPARATOR)
}
