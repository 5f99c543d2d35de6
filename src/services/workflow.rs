//! Event workflow service
//!
//! The approval state machine an event passes through before its
//! invitations can be publicly redeemed. Every transition is validated
//! against the current state and the actor's role before being applied.

use tracing::info;

use crate::database::EventRepository;
use crate::models::event::{Actor, ActorRole, Event, EventStatus};
use crate::utils::errors::{GuestPassError, Result};
use crate::utils::logging;

/// Check the workflow precondition for minting invitations.
///
/// Sits in front of invitation creation: never allowed while the event is
/// pending approval, so sponsors cannot pre-sell seats for an unapproved
/// event.
pub fn ensure_invitation_creation_allowed(event: &Event) -> Result<()> {
    if event.event_status.allows_invitation_creation() {
        Ok(())
    } else {
        Err(GuestPassError::IllegalTransition {
            from: event.event_status.to_string(),
            to: "invitation_creation".to_string(),
        })
    }
}

/// Validate a requested transition against the state machine
fn transition_is_legal(from: EventStatus, to: EventStatus) -> bool {
    use EventStatus::*;

    matches!(
        (from, to),
        (Draft, PendingApproval)
            | (Rejected, PendingApproval)
            | (PendingApproval, Approved)
            | (PendingApproval, Rejected)
            | (Approved, Published)
            | (Published, Completed)
            | (Rejected, Draft)
            | (Draft, Deleted)
            | (Draft, Cancelled)
            | (PendingApproval, Cancelled)
            | (Approved, Cancelled)
            | (Published, Cancelled)
    )
}

/// Check whether the actor's role may move an event into `to`
fn role_may_enter(role: ActorRole, to: EventStatus) -> bool {
    use EventStatus::*;

    match to {
        // Approval decisions and lifecycle closure belong to the platform
        Approved | Published | Rejected | Cancelled | Completed => {
            role == ActorRole::PlatformAdmin
        }
        // Owners submit for approval, resubmit, and delete their drafts
        PendingApproval | Draft | Deleted => true,
    }
}

/// Event workflow over the event repository
#[derive(Debug, Clone)]
pub struct WorkflowService {
    events: EventRepository,
}

impl WorkflowService {
    pub fn new(events: EventRepository) -> Self {
        Self { events }
    }

    /// Apply a status transition on behalf of an actor.
    ///
    /// Entering `rejected` records the supplied reason; resubmitting
    /// `rejected -> draft` clears it. The underlying update is guarded on
    /// the expected current status, so a concurrent transition loses cleanly
    /// instead of overwriting.
    pub async fn transition(
        &self,
        event_id: i64,
        to: EventStatus,
        rejection_reason: Option<String>,
        actor: Actor,
    ) -> Result<Event> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GuestPassError::EventNotFound { event_id })?;
        let from = event.event_status;

        if !transition_is_legal(from, to) {
            return Err(GuestPassError::IllegalTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if !role_may_enter(actor.role, to) {
            return Err(GuestPassError::PermissionDenied(format!(
                "Role is not allowed to move an event to {}",
                to
            )));
        }

        let updated = match to {
            EventStatus::Rejected => {
                self.events
                    .update_status_with_reason(event_id, from, to, rejection_reason)
                    .await?
            }
            EventStatus::Draft => {
                // Resubmission path clears the prior rejection reason
                self.events
                    .update_status_with_reason(event_id, from, to, None)
                    .await?
            }
            _ => self.events.update_status(event_id, from, to).await?,
        };

        match updated {
            Some(event) => {
                logging::log_transition(event_id, from.as_str(), to.as_str(), actor.user_id);
                Ok(event)
            }
            None => {
                // Someone else moved the event between our read and write;
                // report against the authoritative current state
                let current = self
                    .events
                    .find_by_id(event_id)
                    .await?
                    .ok_or(GuestPassError::EventNotFound { event_id })?;
                info!(
                    event_id = event_id,
                    expected = from.as_str(),
                    actual = current.event_status.as_str(),
                    "Transition lost a concurrent status race"
                );
                Err(GuestPassError::IllegalTransition {
                    from: current.event_status.to_string(),
                    to: to.to_string(),
                })
            }
        }
    }
}
