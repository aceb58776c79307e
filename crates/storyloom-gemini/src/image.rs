//! Imagen `predict` wire types and the `ImageGenerator` implementation.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use storyloom_core::error::GenerationError;
use storyloom_core::generation::{
    AspectRatio, GeneratedImage, ImageGenerationRequest, ImageGenerator,
};
use tracing::warn;

use crate::client::GeminiClient;

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: Parameters<'a>,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters<'a> {
    sample_count: u32,
    aspect_ratio: AspectRatio,
    output_options: OutputOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions<'a> {
    mime_type: &'a str,
}

impl<'a> PredictRequest<'a> {
    pub(crate) fn from_request(request: &'a ImageGenerationRequest) -> Self {
        Self {
            instances: [Instance {
                prompt: &request.prompt,
            }],
            parameters: Parameters {
                sample_count: request.number_of_images,
                aspect_ratio: request.aspect_ratio,
                output_options: OutputOptions {
                    mime_type: &request.mime_type,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}

impl PredictResponse {
    /// Decodes every prediction that carries image bytes. Filtered
    /// predictions are skipped.
    pub(crate) fn into_images(
        self,
        requested_mime_type: &str,
    ) -> Result<Vec<GeneratedImage>, GenerationError> {
        let mut images = Vec::with_capacity(self.predictions.len());
        for prediction in self.predictions {
            let Some(encoded) = prediction.bytes_base64_encoded else {
                if let Some(reason) = prediction.rai_filtered_reason {
                    warn!(%reason, "image prediction was filtered");
                }
                continue;
            };
            let bytes = BASE64.decode(encoded).map_err(|e| {
                GenerationError::Transport(format!("image bytes are not valid base64: {e}"))
            })?;
            images.push(GeneratedImage {
                bytes,
                mime_type: prediction
                    .mime_type
                    .unwrap_or_else(|| requested_mime_type.to_owned()),
            });
        }
        Ok(images)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError> {
        let url = self.config.model_url(&self.config.image_model, "predict");
        let body = PredictRequest::from_request(request);

        let response: PredictResponse = self.post_json(&url, &body).await?;
        response.into_images(&request.mime_type)
    }
}
