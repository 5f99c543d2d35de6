//! Event workflow endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::event::{Actor, Event, EventStatus};

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: EventStatus,
    pub rejection_reason: Option<String>,
}

/// PATCH /events/:id/status
///
/// Apply a workflow transition. Illegal transitions report both the current
/// and the requested state.
pub async fn transition_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    actor: Actor,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .services
        .workflow_service
        .transition(event_id, request.status, request.rejection_reason, actor)
        .await?;

    Ok(Json(event))
}
