//! Ports toward the external generation capabilities.
//!
//! The concrete models live behind these traits. The narrative and
//! illustration clients depend only on the traits, so tests inject scripted
//! fakes and production wires in an HTTP adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// A request to the text-generation capability.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenerationRequest {
    /// The directive prompt.
    pub prompt: String,
    /// System directive constraining the output format.
    pub system_instruction: String,
    /// JSON schema declaration the response must follow.
    pub response_schema: serde_json::Value,
}

/// Output aspect ratio for generated images, serialized in its `W:H` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 4:3, the only framing scenes are illustrated in.
    #[serde(rename = "4:3")]
    Landscape,
}

/// A request to the image-generation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenerationRequest {
    /// Full image description, style modifiers included.
    pub prompt: String,
    /// How many images to produce.
    pub number_of_images: u32,
    /// Requested output encoding, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Requested aspect ratio.
    pub aspect_ratio: AspectRatio,
}

/// Raw image content returned by the image-generation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

/// Text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends the request and returns the raw response text.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Transport` if the capability cannot be reached
    /// or answers with a failure.
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<String, GenerationError>;
}

/// Image-generation capability.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Sends the request and returns every image produced, possibly none.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Transport` if the capability cannot be reached
    /// or answers with a failure.
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError>;
}
