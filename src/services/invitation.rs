//! Invitation registry service
//!
//! Owns invitation-code records and their validity rules. Validation is
//! advisory; the actual use-count mutation re-checks everything atomically
//! in `mark_used`.

use chrono::Utc;
use tracing::{debug, info};

use crate::database::{EventRepository, InvitationRepository, SponsorRepository};
use crate::models::invitation::{
    CreateInvitationRequest, Invitation, NewInvitation, UsageType, ValidationReport,
};
use crate::utils::errors::{GuestPassError, Result};
use crate::utils::helpers;

/// Invitation registry over the invitation repository
#[derive(Debug, Clone)]
pub struct InvitationService {
    invitations: InvitationRepository,
    events: EventRepository,
    sponsors: SponsorRepository,
}

impl InvitationService {
    pub fn new(
        invitations: InvitationRepository,
        events: EventRepository,
        sponsors: SponsorRepository,
    ) -> Self {
        Self {
            invitations,
            events,
            sponsors,
        }
    }

    /// Read-only validation for pre-flight display. No mutation.
    pub async fn validate(&self, code: &str) -> Result<(ValidationReport, Option<Invitation>)> {
        debug!(code = code, "Validating invitation code");

        match self.invitations.find_by_code(code).await? {
            None => Ok((ValidationReport::not_found(), None)),
            Some(invitation) => {
                let report = ValidationReport::for_invitation(&invitation, Utc::now());
                Ok((report, Some(invitation)))
            }
        }
    }

    /// Create a new invitation for an event, optionally on behalf of a sponsor.
    ///
    /// Gated by the event workflow: minting is allowed only while the event
    /// is in draft, approved, or published.
    pub async fn create_invitation(
        &self,
        event_id: i64,
        event_sponsor_id: Option<i64>,
        request: CreateInvitationRequest,
    ) -> Result<Invitation> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GuestPassError::EventNotFound { event_id })?;

        super::workflow::ensure_invitation_creation_allowed(&event)?;

        if let Some(sponsor_id) = event_sponsor_id {
            let sponsor = self
                .sponsors
                .find_by_id(sponsor_id)
                .await?
                .ok_or(GuestPassError::SponsorNotFound { sponsor_id })?;

            if sponsor.event_id != event_id {
                return Err(GuestPassError::InvalidInput(
                    "Sponsor does not belong to this event".to_string(),
                ));
            }
            if !sponsor.is_active {
                return Err(GuestPassError::PermissionDenied(
                    "Sponsor is not active".to_string(),
                ));
            }
        }

        let ticket_type = self
            .events
            .find_ticket_type(request.ticket_type_id)
            .await?
            .ok_or_else(|| GuestPassError::InvalidInput("Unknown ticket type".to_string()))?;
        if ticket_type.event_id != event_id {
            return Err(GuestPassError::InvalidInput(
                "Ticket type does not belong to this event".to_string(),
            ));
        }

        let max_uses = normalize_max_uses(request.usage_type, request.max_uses)?;

        if let Some(expires_at) = request.expires_at {
            if expires_at <= Utc::now() {
                return Err(GuestPassError::InvalidInput(
                    "Expiry must be in the future".to_string(),
                ));
            }
        }

        let invitation = self
            .invitations
            .create(NewInvitation {
                code: helpers::generate_invitation_code(),
                event_id,
                event_sponsor_id,
                participant_type: request.participant_type,
                ticket_type_id: request.ticket_type_id,
                usage_type: request.usage_type,
                max_uses,
                expires_at: request.expires_at,
            })
            .await?;

        info!(
            invitation_id = invitation.id,
            event_id = event_id,
            event_sponsor_id = event_sponsor_id,
            code = %invitation.code,
            "Invitation created"
        );

        Ok(invitation)
    }

    /// Atomically consume one use; the advisory validation is re-checked
    /// inside the same UPDATE. `Ok` carries the post-increment invitation.
    pub async fn mark_used(&self, code: &str) -> Result<Invitation> {
        match self.invitations.mark_used(code).await? {
            Some(invitation) => Ok(invitation),
            // Guard failed between validation and the write; classify from
            // a fresh read so the caller gets the precise reason
            None => match self.invitations.find_by_code(code).await? {
                None => Err(GuestPassError::InvitationNotFound {
                    code: code.to_string(),
                }),
                Some(current) => {
                    if !current.is_active {
                        Err(GuestPassError::InvitationInactive)
                    } else if current.is_expired(Utc::now()) {
                        Err(GuestPassError::InvitationExpired)
                    } else {
                        Err(GuestPassError::ConcurrentRedemption)
                    }
                }
            },
        }
    }

    /// Roll back an increment whose redemption never committed
    pub async fn unmark_used(&self, invitation_id: i64) -> Result<()> {
        self.invitations.unmark_used(invitation_id).await
    }

    /// Toggle the manual kill switch after checking the invitation belongs
    /// to the addressed event and sponsor
    pub async fn set_active(
        &self,
        event_id: i64,
        event_sponsor_id: i64,
        invitation_id: i64,
        is_active: bool,
    ) -> Result<Invitation> {
        let invitation = self
            .invitations
            .find_by_id(invitation_id)
            .await?
            .ok_or_else(|| GuestPassError::InvitationNotFound {
                code: invitation_id.to_string(),
            })?;

        if invitation.event_id != event_id || invitation.event_sponsor_id != Some(event_sponsor_id)
        {
            return Err(GuestPassError::InvalidInput(
                "Invitation does not belong to this event and sponsor".to_string(),
            ));
        }

        let updated = self
            .invitations
            .set_active(invitation_id, is_active)
            .await?
            .ok_or_else(|| GuestPassError::InvitationNotFound {
                code: invitation_id.to_string(),
            })?;

        info!(
            invitation_id = invitation_id,
            is_active = is_active,
            "Invitation active flag updated"
        );

        Ok(updated)
    }
}

/// Normalize the usage policy: single is implicitly one use, unlimited has
/// no bound, and multiple requires an explicit positive bound.
fn normalize_max_uses(usage_type: UsageType, max_uses: Option<i32>) -> Result<Option<i32>> {
    match usage_type {
        UsageType::Single => Ok(Some(1)),
        UsageType::Unlimited => Ok(None),
        UsageType::Multiple => match max_uses {
            Some(max) if max >= 1 => Ok(Some(max)),
            Some(_) => Err(GuestPassError::InvalidInput(
                "max_uses must be at least 1".to_string(),
            )),
            None => Err(GuestPassError::InvalidInput(
                "max_uses is required for multiple-use invitations".to_string(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_single_normalizes_to_one() {
        assert_eq!(
            normalize_max_uses(UsageType::Single, None).unwrap(),
            Some(1)
        );
        // An explicit value is ignored, single is always one use
        assert_eq!(
            normalize_max_uses(UsageType::Single, Some(5)).unwrap(),
            Some(1)
        );
    }

    #[test]
    fn test_unlimited_normalizes_to_none() {
        assert_eq!(normalize_max_uses(UsageType::Unlimited, None).unwrap(), None);
        assert_eq!(
            normalize_max_uses(UsageType::Unlimited, Some(5)).unwrap(),
            None
        );
    }

    #[test]
    fn test_multiple_requires_positive_bound() {
        assert_eq!(
            normalize_max_uses(UsageType::Multiple, Some(10)).unwrap(),
            Some(10)
        );
        assert_matches!(
            normalize_max_uses(UsageType::Multiple, None),
            Err(GuestPassError::InvalidInput(_))
        );
        assert_matches!(
            normalize_max_uses(UsageType::Multiple, Some(0)),
            Err(GuestPassError::InvalidInput(_))
        );
    }
}
