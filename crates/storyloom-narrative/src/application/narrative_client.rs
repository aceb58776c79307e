//! Narrative Generation Client.

use std::sync::Arc;
use std::time::Duration;

use storyloom_core::error::GenerationError;
use storyloom_core::generation::{TextGenerationRequest, TextGenerator};
use tracing::{debug, warn};

use super::{DEFAULT_CALL_TIMEOUT, bounded};
use crate::domain::generation_result::GenerationResult;
use crate::domain::prompts::{SYSTEM_INSTRUCTION, response_schema};

/// Number of choices the directive prompts ask for.
const REQUESTED_CHOICES: std::ops::RangeInclusive<usize> = 3..=4;

/// Wraps the text-generation capability and enforces the narrative schema.
#[derive(Clone)]
pub struct NarrativeClient {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl std::fmt::Debug for NarrativeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl NarrativeClient {
    /// Creates a client with the default call timeout.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Overrides the bound on each call to the capability.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `prompt` with the fixed schema and system instruction, then
    /// validates the response.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Parse` if the response does not match the
    /// schema, `GenerationError::Timeout` if the call exceeds the bound, or the
    /// capability's own error otherwise.
    pub async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
        let request = TextGenerationRequest {
            prompt: prompt.to_owned(),
            system_instruction: SYSTEM_INSTRUCTION.to_owned(),
            response_schema: response_schema(),
        };

        let raw = bounded(self.timeout, self.generator.generate_text(&request)).await?;

        let result = GenerationResult::from_response_text(&raw).inspect_err(|e| {
            warn!(error = %e, response = %raw, "narrative response rejected");
        })?;

        if !REQUESTED_CHOICES.contains(&result.choices.len()) {
            warn!(
                choices = result.choices.len(),
                "narrative returned an unexpected number of choices"
            );
        }
        debug!(choices = result.choices.len(), "narrative generated");

        Ok(result)
    }
}
