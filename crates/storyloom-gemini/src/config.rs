//! Gemini adapter configuration.

/// Public endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for structured narrative generation.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for illustrations.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Connection settings for the Gemini adapter.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Scheme and host, without a trailing slash.
    pub base_url: String,
    /// Model used for `generateContent`.
    pub text_model: String,
    /// Model used for `predict`.
    pub image_model: String,
}

impl GeminiConfig {
    /// Creates a configuration with the default endpoint and models.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            text_model: DEFAULT_TEXT_MODEL.to_owned(),
            image_model: DEFAULT_IMAGE_MODEL.to_owned(),
        }
    }

    /// Overrides the endpoint, e.g. to point at a proxy or a local stub.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// URL of a model method, e.g. `generateContent`.
    #[must_use]
    pub fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{model}:{method}", self.base_url)
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}
