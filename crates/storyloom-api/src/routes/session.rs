//! Routes for the Session context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use storyloom_session::application::command_handlers;
use storyloom_session::application::query_handlers::{self, SessionView};
use storyloom_session::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{id}/start.
#[derive(Debug, Deserialize)]
pub struct StartStoryRequest {
    /// Free-text premise for the opening scene.
    pub premise: String,
}

/// Request body for POST /{id}/advance.
#[derive(Debug, Deserialize)]
pub struct ChooseActionRequest {
    /// The chosen action, normally one of the offered choices.
    pub choice: String,
}

/// POST /
#[instrument(skip(state))]
async fn create_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = command_handlers::handle_create_session(state.clock.as_ref(), &state.sessions);
    Json(SessionView::from(&session))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_by_id(session_id, &state.sessions)?;
    Ok(Json(view))
}

/// POST /{id}/start
#[instrument(skip(state, request))]
async fn start_story(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<StartStoryRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::StartStory {
        correlation_id: Uuid::new_v4(),
        session_id,
        premise: request.premise,
    };

    info!(correlation_id = %command.correlation_id, "handling start_story command");

    let session = command_handlers::handle_start_story(
        &command,
        &state.clock,
        &state.sessions,
        &state.scenes,
    )
    .await?;

    Ok(Json(SessionView::from(&session)))
}

/// POST /{id}/advance
#[instrument(skip(state, request))]
async fn choose_action(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChooseActionRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ChooseAction {
        correlation_id: Uuid::new_v4(),
        session_id,
        choice: request.choice,
    };

    info!(correlation_id = %command.correlation_id, "handling choose_action command");

    let session = command_handlers::handle_choose_action(
        &command,
        &state.clock,
        &state.sessions,
        &state.scenes,
    )
    .await?;

    Ok(Json(SessionView::from(&session)))
}

/// POST /{id}/restart
#[instrument(skip(state))]
async fn restart_story(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::RestartStory {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling restart_story command");

    let session =
        command_handlers::handle_restart_story(&command, state.clock.as_ref(), &state.sessions)?;

    Ok(Json(SessionView::from(&session)))
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{session_id}", get(get_session))
        .route("/{session_id}/start", post(start_story))
        .route("/{session_id}/advance", post(choose_action))
        .route("/{session_id}/restart", post(restart_story))
}
