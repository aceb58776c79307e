//! Test image generators: fake `ImageGenerator` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use storyloom_core::error::GenerationError;
use storyloom_core::generation::{GeneratedImage, ImageGenerationRequest, ImageGenerator};

/// An image generator that returns one fixed JPEG payload per call and records
/// every request.
#[derive(Debug, Default)]
pub struct RecordingImageGenerator {
    requests: Mutex<Vec<ImageGenerationRequest>>,
}

impl RecordingImageGenerator {
    /// The bytes returned for every generated image.
    pub const IMAGE_BYTES: &'static [u8] = b"jpeg-bytes";

    /// Create a new recording generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<ImageGenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for RecordingImageGenerator {
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(vec![GeneratedImage {
            bytes: Self::IMAGE_BYTES.to_vec(),
            mime_type: request.mime_type.clone(),
        }])
    }
}

/// An image generator that succeeds but returns zero images.
#[derive(Debug)]
pub struct EmptyImageGenerator;

#[async_trait]
impl ImageGenerator for EmptyImageGenerator {
    async fn generate_images(
        &self,
        _request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError> {
        Ok(Vec::new())
    }
}

/// An image generator that always fails with a transport error.
#[derive(Debug)]
pub struct FailingImageGenerator;

#[async_trait]
impl ImageGenerator for FailingImageGenerator {
    async fn generate_images(
        &self,
        _request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError> {
        Err(GenerationError::Transport("quota exceeded".into()))
    }
}
