//! `generateContent` wire types and the `TextGenerator` implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyloom_core::error::GenerationError;
use storyloom_core::generation::{TextGenerationRequest, TextGenerator};

use crate::client::GeminiClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

impl<'a> GenerateContentRequest<'a> {
    pub(crate) fn from_request(request: &'a TextGenerationRequest) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub(crate) fn into_text(self) -> Result<String, GenerationError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or_else(|| GenerationError::Transport("response contained no candidates".into()))?;

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            return Err(GenerationError::Transport(
                "response candidate contained no text".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<String, GenerationError> {
        let url = self
            .config
            .model_url(&self.config.text_model, "generateContent");
        let body = GenerateContentRequest::from_request(request);

        let response: GenerateContentResponse = self.post_json(&url, &body).await?;
        response.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_declares_json_schema_and_system_instruction() {
        // Arrange
        let request = TextGenerationRequest {
            prompt: "Begin".to_owned(),
            system_instruction: "Only JSON".to_owned(),
            response_schema: json!({"type": "OBJECT"}),
        };

        // Act
        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        // Assert
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Begin"}]}],
                "systemInstruction": {"parts": [{"text": "Only JSON"}]},
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"}
                }
            })
        );
    }

    #[test]
    fn test_into_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();

        assert_eq!(response.into_text().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_into_text_without_candidates_is_transport_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();

        assert!(matches!(
            response.into_text(),
            Err(GenerationError::Transport(_))
        ));
    }
}
