//! Public invitation endpoints: pre-flight validation and redemption

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::event::Actor;
use crate::models::invitation::{Invitation, ParticipantType, ValidationReport};
use crate::models::participant::RedeemRequest;

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub invitation: Option<Invitation>,
}

/// GET /invitations/:code/validate
///
/// Read-only pre-flight check for the registration UI. Never mutates; the
/// result is advisory and re-checked atomically on accept.
pub async fn validate_invitation(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let (report, invitation) = state.services.invitation_service.validate(&code).await?;

    let ValidationReport { valid, errors, .. } = report;
    Ok(Json(ValidateResponse {
        valid,
        errors,
        invitation,
    }))
}

#[derive(Debug, Serialize)]
pub struct AcceptedParticipant {
    pub id: i64,
    pub participant_type: ParticipantType,
}

#[derive(Debug, Serialize)]
pub struct AcceptedTicket {
    pub id: i64,
    pub ticket_number: String,
    pub qr_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub success: bool,
    pub message: String,
    pub participant: AcceptedParticipant,
    pub ticket: AcceptedTicket,
}

/// POST /invitations/:code/accept
///
/// Exchange a valid code for a participant and ticket. `user_data` is
/// required in both modes: there is no local account store to source
/// contact fields from, so even `accept_with_auth` redemptions carry them
/// in the body. The actor headers are optional here: anonymous redemption
/// is anonymous, authenticated redemption links the gateway identity as
/// the redeemer.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Path(code): Path<String>,
    actor: Option<Actor>,
    Json(request): Json<RedeemRequest>,
) -> Result<(StatusCode, Json<AcceptResponse>), ApiError> {
    let outcome = state
        .services
        .redemption_service
        .redeem(&code, &request, actor.map(|a| a.user_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AcceptResponse {
            success: true,
            message: "Registration complete".to_string(),
            participant: AcceptedParticipant {
                id: outcome.participant.id,
                participant_type: outcome.participant.participant_type,
            },
            ticket: AcceptedTicket {
                id: outcome.ticket.id,
                ticket_number: outcome.ticket.ticket_number,
                qr_code: outcome.ticket.qr_code,
            },
        }),
    ))
}
