//! Illustration Client.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use storyloom_core::error::GenerationError;
use storyloom_core::generation::{AspectRatio, ImageGenerationRequest, ImageGenerator};
use tracing::debug;

use super::{DEFAULT_CALL_TIMEOUT, bounded};
use crate::domain::prompts::styled_image_prompt;

/// Output encoding requested from the image capability.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Aspect ratio requested from the image capability.
pub const IMAGE_ASPECT_RATIO: AspectRatio = AspectRatio::Landscape;

/// Wraps the image-generation capability and turns its output into a
/// renderable `data:` URL.
#[derive(Clone)]
pub struct IllustrationClient {
    generator: Arc<dyn ImageGenerator>,
    timeout: Duration,
}

impl std::fmt::Debug for IllustrationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IllustrationClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl IllustrationClient {
    /// Creates a client with the default call timeout.
    #[must_use]
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
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

    /// Requests a single styled illustration for `image_prompt`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Illustration` if no image comes back,
    /// `GenerationError::Timeout` if the call exceeds the bound, or the
    /// capability's own error otherwise.
    pub async fn illustrate(&self, image_prompt: &str) -> Result<String, GenerationError> {
        let request = ImageGenerationRequest {
            prompt: styled_image_prompt(image_prompt),
            number_of_images: 1,
            mime_type: IMAGE_MIME_TYPE.to_owned(),
            aspect_ratio: IMAGE_ASPECT_RATIO,
        };

        let images = bounded(self.timeout, self.generator.generate_images(&request)).await?;

        let image = images
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::Illustration("no images were returned".into()))?;

        debug!(bytes = image.bytes.len(), mime_type = %image.mime_type, "illustration generated");

        Ok(format!(
            "data:{};base64,{}",
            image.mime_type,
            BASE64.encode(&image.bytes)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storyloom_test_support::{
        EmptyImageGenerator, FailingImageGenerator, RecordingImageGenerator,
    };

    #[tokio::test]
    async fn test_illustrate_requests_one_styled_landscape_jpeg() {
        // Arrange
        let generator = Arc::new(RecordingImageGenerator::new());
        let client = IllustrationClient::new(generator.clone());

        // Act
        let image = client.illustrate("a flooded crypt").await.unwrap();

        // Assert
        assert_eq!(
            image,
            format!(
                "data:image/jpeg;base64,{}",
                BASE64.encode(RecordingImageGenerator::IMAGE_BYTES)
            )
        );
        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].number_of_images, 1);
        assert_eq!(requests[0].mime_type, "image/jpeg");
        assert_eq!(requests[0].aspect_ratio, AspectRatio::Landscape);
        assert!(requests[0].prompt.starts_with("a flooded crypt, painterly"));
    }

    #[tokio::test]
    async fn test_illustrate_fails_when_no_images_returned() {
        let client = IllustrationClient::new(Arc::new(EmptyImageGenerator));

        let result = client.illustrate("a flooded crypt").await;

        assert!(matches!(result, Err(GenerationError::Illustration(_))));
    }

    #[tokio::test]
    async fn test_illustrate_propagates_transport_error() {
        let client = IllustrationClient::new(Arc::new(FailingImageGenerator));

        let result = client.illustrate("a flooded crypt").await;

        assert!(matches!(result, Err(GenerationError::Transport(_))));
    }
}
