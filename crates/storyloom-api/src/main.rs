//! Storyloom API server entry point.

use std::sync::Arc;

use axum::Router;
use storyloom_api::config::AppConfig;
use storyloom_api::error::AppError;
use storyloom_api::routes;
use storyloom_api::state::AppState;
use storyloom_core::clock::SystemClock;
use storyloom_gemini::GeminiClient;
use storyloom_narrative::application::illustration_client::IllustrationClient;
use storyloom_narrative::application::narrative_client::NarrativeClient;
use storyloom_narrative::application::scene_service::SceneGenerationService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Storyloom API server");

    let config = AppConfig::from_env()?;
    tracing::info!(
        text_model = %config.gemini.text_model,
        image_model = %config.gemini.image_model,
        timeout_secs = config.generation_timeout.as_secs(),
        "generation configured"
    );

    let gemini = Arc::new(GeminiClient::new(config.gemini)?);
    let scenes = SceneGenerationService::new(
        NarrativeClient::new(gemini.clone()),
        IllustrationClient::new(gemini),
    )
    .with_call_timeout(config.generation_timeout);

    let app_state = AppState::new(Arc::new(SystemClock), scenes);

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    tracing::info!("Listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
