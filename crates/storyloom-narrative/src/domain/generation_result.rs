//! The structured narrative payload and its validation.

use serde::Deserialize;
use storyloom_core::error::GenerationError;

/// Structured output of the narrative capability.
///
/// Transient: it is folded into a [`Scene`](super::scene::Scene) and the
/// session's choice list, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Second-person scene prose.
    pub scene_description: String,
    /// Prompt for the illustration capability.
    pub image_prompt: String,
    /// Action choices offered to the player.
    pub choices: Vec<String>,
}

impl GenerationResult {
    /// Parses and validates the raw narrative response.
    ///
    /// The text must be a JSON object with a non-blank `sceneDescription`, a
    /// non-blank `imagePrompt`, and a `choices` array of strings. Any deviation
    /// is rejected; nothing is repaired.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Parse` if the text is not JSON, a field is
    /// missing or mistyped, or a required string is blank.
    pub fn from_response_text(raw: &str) -> Result<Self, GenerationError> {
        let result: Self = serde_json::from_str(raw.trim())
            .map_err(|e| GenerationError::Parse(format!("invalid narrative payload: {e}")))?;

        if result.scene_description.trim().is_empty() {
            return Err(GenerationError::Parse("sceneDescription is empty".into()));
        }
        if result.image_prompt.trim().is_empty() {
            return Err(GenerationError::Parse("imagePrompt is empty".into()));
        }

        Ok(result)
    }
}
