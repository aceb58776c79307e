//! Shared HTTP plumbing for the Gemini adapter.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use storyloom_core::error::GenerationError;
use tracing::{debug, warn};

use crate::config::GeminiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the Generative Language API.
///
/// Implements both [`TextGenerator`](storyloom_core::generation::TextGenerator)
/// and [`ImageGenerator`](storyloom_core::generation::ImageGenerator).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    pub(crate) config: GeminiConfig,
}

impl GeminiClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be initialised.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    /// POSTs `body` as JSON to `url` and decodes the JSON reply.
    pub(crate) async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(url, "calling gemini");

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, url, body = %detail, "gemini returned an error status");
            return Err(GenerationError::Transport(format!(
                "gemini returned {status}: {detail}"
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| GenerationError::Transport(format!("unreadable response body: {e}")))
    }
}
