//! Startup configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use storyloom_gemini::GeminiConfig;
use storyloom_narrative::application::DEFAULT_CALL_TIMEOUT;

use crate::error::AppError;

/// Settings the server needs before it can accept requests.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini endpoint, key and model names.
    pub gemini: GeminiConfig,
    /// Upper bound on each external generation call.
    pub generation_timeout: Duration,
    /// Address the listener binds to.
    pub addr: SocketAddr,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the API key is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the API key is missing or a value does
    /// not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = var("GEMINI_API_KEY").or_else(|| var("API_KEY")).ok_or_else(|| {
            AppError::Config("GEMINI_API_KEY (or API_KEY) environment variable must be set".into())
        })?;

        let mut gemini = GeminiConfig::new(api_key);
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            gemini = gemini.with_base_url(base_url);
        }
        if let Some(model) = var("STORYLOOM_TEXT_MODEL") {
            gemini.text_model = model;
        }
        if let Some(model) = var("STORYLOOM_IMAGE_MODEL") {
            gemini.image_model = model;
        }

        let generation_timeout = match var("GENERATION_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| {
                    AppError::Config(format!("GENERATION_TIMEOUT_SECS must be a whole number: {e}"))
                })?;
                if secs == 0 {
                    return Err(AppError::Config(
                        "GENERATION_TIMEOUT_SECS must be greater than zero".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_CALL_TIMEOUT,
        };

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port: u16 = var("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        Ok(Self {
            gemini,
            generation_timeout,
            addr,
        })
    }
}
