//! Sponsor-scoped endpoints: invitation minting, kill switch, quota edits

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::event::Actor;
use crate::models::invitation::{CreateInvitationRequest, Invitation};
use crate::models::sponsor::{EventSponsor, UpdateQuotaRequest};
use crate::utils::errors::GuestPassError;

/// POST /events/:event_id/sponsors/:sponsor_id/invitations
///
/// Mint a new invitation on behalf of a sponsor. Gated on the owning
/// event's workflow status.
pub async fn create_invitation(
    State(state): State<AppState>,
    Path((event_id, sponsor_id)): Path<(i64, i64)>,
    _actor: Actor,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<Invitation>), ApiError> {
    let invitation = state
        .services
        .invitation_service
        .create_invitation(event_id, Some(sponsor_id), request)
        .await?;

    Ok((StatusCode::CREATED, Json(invitation)))
}

/// Body for the invitation PATCH: the active flag is the only mutable
/// field on this path, use counters are not reachable here
#[derive(Debug, Deserialize)]
pub struct ToggleInvitationRequest {
    pub is_active: bool,
}

/// PATCH /events/:event_id/sponsors/:sponsor_id/invitations/:id
pub async fn toggle_invitation(
    State(state): State<AppState>,
    Path((event_id, sponsor_id, invitation_id)): Path<(i64, i64, i64)>,
    _actor: Actor,
    Json(request): Json<ToggleInvitationRequest>,
) -> Result<Json<Invitation>, ApiError> {
    let invitation = state
        .services
        .invitation_service
        .set_active(event_id, sponsor_id, invitation_id, request.is_active)
        .await?;

    Ok(Json(invitation))
}

/// PATCH /events/:event_id/sponsors/:sponsor_id
///
/// Admin quota edit; rejected when any pool quota would fall below its
/// consumed count.
pub async fn update_sponsor(
    State(state): State<AppState>,
    Path((event_id, sponsor_id)): Path<(i64, i64)>,
    _actor: Actor,
    Json(request): Json<UpdateQuotaRequest>,
) -> Result<Json<EventSponsor>, ApiError> {
    let sponsor = state.services.quota_service.get_sponsor(sponsor_id).await?;
    if sponsor.event_id != event_id {
        return Err(ApiError(GuestPassError::InvalidInput(
            "Sponsor does not belong to this event".to_string(),
        )));
    }

    let updated = state
        .services
        .quota_service
        .update_quotas(sponsor_id, request)
        .await?;

    Ok(Json(updated))
}
