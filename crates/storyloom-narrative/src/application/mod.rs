//! Application layer for the Scene Generation context.

use std::future::Future;
use std::time::Duration;

use storyloom_core::error::GenerationError;

pub mod illustration_client;
pub mod narrative_client;
pub mod scene_service;

/// Default bound on a single external generation call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(90);

/// Runs one external call under `limit`, mapping expiry to
/// `GenerationError::Timeout`.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, GenerationError>
where
    F: Future<Output = Result<T, GenerationError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| GenerationError::Timeout(limit))?
}
