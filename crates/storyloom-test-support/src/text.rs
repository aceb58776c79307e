//! Test text generators: fake `TextGenerator` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use storyloom_core::error::GenerationError;
use storyloom_core::generation::{TextGenerationRequest, TextGenerator};

/// A text generator that replays a scripted queue of responses and records
/// every request it receives.
///
/// Each call pops the next response. Once the script is exhausted every call
/// fails with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedTextGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<TextGenerationRequest>>,
}

impl ScriptedTextGenerator {
    /// Create a generator that answers with `responses` in order.
    #[must_use]
    pub fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a generator that answers every listed call successfully.
    #[must_use]
    pub fn replying(texts: &[String]) -> Self {
        Self::new(texts.iter().cloned().map(Ok).collect())
    }

    /// Returns a snapshot of all requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<TextGenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Transport("script exhausted".into())))
    }
}

/// A text generator that always fails with a transport error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingTextGenerator;

#[async_trait]
impl TextGenerator for FailingTextGenerator {
    async fn generate_text(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Transport("connection refused".into()))
    }
}

/// Builds a well-formed narrative response body.
#[must_use]
pub fn narrative_json(scene_description: &str, image_prompt: &str, choices: &[&str]) -> String {
    serde_json::json!({
        "sceneDescription": scene_description,
        "imagePrompt": image_prompt,
        "choices": choices,
    })
    .to_string()
}
