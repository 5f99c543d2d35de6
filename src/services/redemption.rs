//! Redemption engine
//!
//! The transactional core: exchanges a valid code for a participant and
//! ticket record. Quota is reserved before the invitation's use counter is
//! incremented, and every later failure rolls both back synchronously
//! before the error surfaces. A redemption attempt either commits all of
//! its effects or none of them.

use tracing::{debug, error, warn};

use crate::database::{EventRepository, ParticipantRepository};
use crate::models::invitation::Invitation;
use crate::models::participant::{NewParticipant, Participant, RedeemRequest, Ticket};
use crate::services::invitation::InvitationService;
use crate::services::quota::{QuotaReservation, QuotaService};
use crate::utils::errors::{GuestPassError, Result};
use crate::utils::helpers;
use crate::utils::logging;

/// Result of a committed redemption
#[derive(Debug, Clone)]
pub struct RedemptionOutcome {
    pub invitation: Invitation,
    pub participant: Participant,
    pub ticket: Ticket,
}

/// Redemption engine orchestrating the registry, the ledger, and the
/// participant store
#[derive(Debug, Clone)]
pub struct RedemptionService {
    events: EventRepository,
    participants: ParticipantRepository,
    invitation_service: InvitationService,
    quota_service: QuotaService,
}

impl RedemptionService {
    pub fn new(
        events: EventRepository,
        participants: ParticipantRepository,
        invitation_service: InvitationService,
        quota_service: QuotaService,
    ) -> Self {
        Self {
            events,
            participants,
            invitation_service,
            quota_service,
        }
    }

    /// Redeem a code for the given identity.
    ///
    /// Storage timeouts are the one internally retried condition: the
    /// attempt has already rolled back its partial effects, so a single
    /// fresh attempt is safe. Every other failure surfaces immediately.
    pub async fn redeem(
        &self,
        code: &str,
        request: &RedeemRequest,
        actor_user_id: Option<i64>,
    ) -> Result<RedemptionOutcome> {
        match self.attempt(code, request, actor_user_id).await {
            Err(GuestPassError::StorageTimeout) => {
                warn!(code = code, "Redemption hit a storage timeout, retrying once");
                self.attempt(code, request, actor_user_id).await
            }
            other => other,
        }
    }

    /// One redemption attempt: Received -> Validated -> QuotaReserved ->
    /// Committed, with a distinct rejection reason on every failure edge.
    async fn attempt(
        &self,
        code: &str,
        request: &RedeemRequest,
        actor_user_id: Option<i64>,
    ) -> Result<RedemptionOutcome> {
        // Received: load the invitation and its owning event
        let invitation = self
            .invitation_service
            .validate(code)
            .await
            .and_then(|(report, invitation)| match invitation {
                None => Err(GuestPassError::InvitationNotFound {
                    code: code.to_string(),
                }),
                Some(invitation) => {
                    if !report.is_active {
                        Err(GuestPassError::InvitationInactive)
                    } else if report.is_expired {
                        Err(GuestPassError::InvitationExpired)
                    } else if !report.has_available_uses {
                        Err(GuestPassError::NoUsesLeft)
                    } else {
                        Ok(invitation)
                    }
                }
            })
            .inspect_err(|e| logging::log_rejection(code, e.reason_code()))?;

        let event = self
            .events
            .find_by_id(invitation.event_id)
            .await?
            .ok_or(GuestPassError::EventNotFound {
                event_id: invitation.event_id,
            })?;
        if !event.event_status.accepts_registration() {
            logging::log_rejection(code, "event_not_published");
            return Err(GuestPassError::EventNotPublished { event_id: event.id });
        }

        let new_participant = build_participant(&invitation, request, actor_user_id)?;

        // QuotaReserved: charge the sponsor pool, if one applies. Regular
        // and operational_staff codes, and organizer-issued codes without a
        // sponsor, consume invitation uses only.
        let reservation: Option<QuotaReservation> = match (
            invitation.participant_type.quota_pool(),
            invitation.event_sponsor_id,
        ) {
            (Some(pool), Some(sponsor_id)) => {
                match self.quota_service.reserve(sponsor_id, pool, 1).await {
                    Ok(reservation) => Some(reservation),
                    Err(e) => {
                        logging::log_rejection(code, e.reason_code());
                        return Err(e);
                    }
                }
            }
            _ => None,
        };

        // Consume the invitation use; the registry re-checks validity in
        // the same statement
        let marked = match self.invitation_service.mark_used(code).await {
            Ok(marked) => marked,
            Err(e) => {
                // The rejection classification is what must surface; a
                // failed release is logged and left to reconciliation,
                // same as the commit-failure rollback below
                if let Some(reservation) = reservation {
                    if let Err(release_err) = self.quota_service.release(reservation).await {
                        error!(
                            code = code,
                            error = %release_err,
                            "Failed to roll back quota reservation"
                        );
                    }
                }
                logging::log_rejection(code, e.reason_code());
                return Err(e);
            }
        };

        // Committed: participant + ticket + use-log row, atomically
        let ticket_number = helpers::generate_ticket_number();
        let qr_code = helpers::generate_qr_payload();
        match self
            .participants
            .create_redeemed(new_participant, invitation.ticket_type_id, &ticket_number, &qr_code)
            .await
        {
            Ok((participant, ticket)) => {
                if let Some(reservation) = reservation {
                    self.quota_service.commit(reservation);
                }
                logging::log_redemption(code, event.id, participant.id, &ticket.ticket_number);
                Ok(RedemptionOutcome {
                    invitation: marked,
                    participant,
                    ticket,
                })
            }
            Err(e) => {
                self.rollback(code, &marked, reservation).await;
                logging::log_rejection(code, e.reason_code());
                Err(e)
            }
        }
    }

    /// Reverse the use-count increment and the quota reservation after the
    /// commit step failed. Rollback failures are logged and left to the
    /// reconciliation safety net; the original error is what surfaces.
    async fn rollback(
        &self,
        code: &str,
        marked: &Invitation,
        reservation: Option<QuotaReservation>,
    ) {
        debug!(code = code, invitation_id = marked.id, "Rolling back redemption");

        if let Err(e) = self.invitation_service.unmark_used(marked.id).await {
            error!(
                code = code,
                invitation_id = marked.id,
                error = %e,
                "Failed to roll back invitation use count"
            );
        }

        if let Some(reservation) = reservation {
            if let Err(e) = self.quota_service.release(reservation).await {
                error!(
                    code = code,
                    error = %e,
                    "Failed to roll back quota reservation"
                );
            }
        }
    }
}

/// Resolve the participant record from the request identity.
///
/// Contact details always come from `user_data`; `accept_with_auth` links
/// the participant to the authenticated redeemer forwarded by the gateway.
fn build_participant(
    invitation: &Invitation,
    request: &RedeemRequest,
    actor_user_id: Option<i64>,
) -> Result<NewParticipant> {
    let user_data = request
        .user_data
        .as_ref()
        .ok_or_else(|| GuestPassError::InvalidInput("user_data is required".to_string()))?;

    if user_data.first_name.trim().is_empty() || user_data.email.trim().is_empty() {
        return Err(GuestPassError::InvalidInput(
            "first_name and email are required".to_string(),
        ));
    }

    let redeemer_user_id = if request.accept_with_auth {
        match actor_user_id {
            Some(id) => Some(id),
            None => {
                return Err(GuestPassError::InvalidInput(
                    "accept_with_auth requires an authenticated redeemer".to_string(),
                ))
            }
        }
    } else {
        None
    };

    Ok(NewParticipant {
        event_id: invitation.event_id,
        invitation_id: invitation.id,
        participant_type: invitation.participant_type,
        first_name: user_data.first_name.clone(),
        last_name: user_data.last_name.clone(),
        email: user_data.email.clone(),
        phone: user_data.phone.clone(),
        redeemer_user_id,
    })
}
