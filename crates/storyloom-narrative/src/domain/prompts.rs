//! Directive prompts, the fixed response schema, and illustration style.

use serde_json::{Value, json};

/// System directive sent with every narrative request.
pub const SYSTEM_INSTRUCTION: &str = "You are a master storyteller and game master for a dynamic \
text-based adventure game. Your responses MUST be in a valid JSON format as per the provided \
schema. Do not include any text, comments, or markdown backticks outside of the JSON object.";

/// Style modifiers appended to every image prompt.
pub const IMAGE_STYLE: &str =
    "painterly, digital art, high fantasy, atmospheric, dramatic lighting";

/// Returns the response schema declaration the narrative capability must follow.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sceneDescription": {
                "type": "STRING",
                "description": "A detailed, engaging, and atmospheric description of the current \
                    scene, written in the second person ('You see...'). It should be about 2-3 \
                    paragraphs long."
            },
            "imagePrompt": {
                "type": "STRING",
                "description": format!(
                    "A rich, descriptive prompt for an AI image generator. The style should be \
                     '{IMAGE_STYLE}'."
                )
            },
            "choices": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of 3 to 4 short, action-oriented choices for the player. \
                    e.g., 'Inspect the altar', 'Leave the cave'."
            }
        },
        "required": ["sceneDescription", "imagePrompt", "choices"]
    })
}

/// Builds the directive for the opening scene of a new story.
#[must_use]
pub fn opening_prompt(premise: &str) -> String {
    format!(
        "Create the opening scene for a text adventure game based on this theme: \"{premise}\". \
         Describe the initial setting, provide a compelling visual prompt for an AI image \
         generator, and offer 3-4 distinct choices for the player to make."
    )
}

/// Builds the directive for the scene following `choice`, given the story so far.
#[must_use]
pub fn continuation_prompt(story_context: &str, choice: &str) -> String {
    format!(
        "The player is in a text adventure game. Here is a summary of what has happened so \
         far:\n{story_context}\n\nThe player has just chosen to: \"{choice}\".\n\nContinue the \
         story. Describe what happens next, provide a new visual prompt for the scene, and create \
         3-4 new, distinct choices for the player. Ensure the story is coherent and engaging."
    )
}

/// Applies the fixed illustration style to a narrative-derived image prompt.
#[must_use]
pub fn styled_image_prompt(image_prompt: &str) -> String {
    format!("{}, {IMAGE_STYLE}", image_prompt.trim())
}
