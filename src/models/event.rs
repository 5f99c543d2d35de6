//! Event model and approval workflow states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Event approval workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Published,
    Cancelled,
    Completed,
    Deleted,
}

impl EventStatus {
    /// Stable wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::PendingApproval => "pending_approval",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
            EventStatus::Deleted => "deleted",
        }
    }

    /// Human-readable status label
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Draft => "Draft",
            EventStatus::PendingApproval => "Pending approval",
            EventStatus::Approved => "Approved",
            EventStatus::Rejected => "Rejected",
            EventStatus::Published => "Published",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::Completed => "Completed",
            EventStatus::Deleted => "Deleted",
        }
    }

    /// Whether invitations may be minted while the event is in this status.
    ///
    /// Never true for `pending_approval`: sponsors must not pre-sell seats
    /// for an event that has not been approved yet.
    pub fn allows_invitation_creation(&self) -> bool {
        matches!(
            self,
            EventStatus::Draft | EventStatus::Approved | EventStatus::Published
        )
    }

    /// Whether invitation codes may be redeemed against this event
    pub fn accepts_registration(&self) -> bool {
        matches!(self, EventStatus::Published)
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of the actor performing a workflow or registry operation,
/// as asserted by the upstream authentication gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    PlatformAdmin,
    CompanyAdmin,
}

/// Authenticated actor identity forwarded by the gateway
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: i64,
    pub role: ActorRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_status: EventStatus,
    pub rejection_reason: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<i64>,
}

/// Ticket category within an event, referenced by invitations and tickets
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketType {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_creation_gate() {
        assert!(EventStatus::Draft.allows_invitation_creation());
        assert!(EventStatus::Approved.allows_invitation_creation());
        assert!(EventStatus::Published.allows_invitation_creation());
        assert!(!EventStatus::PendingApproval.allows_invitation_creation());
        assert!(!EventStatus::Rejected.allows_invitation_creation());
        assert!(!EventStatus::Cancelled.allows_invitation_creation());
    }

    #[test]
    fn test_only_published_accepts_registration() {
        assert!(EventStatus::Published.accepts_registration());
        assert!(!EventStatus::Approved.accepts_registration());
        assert!(!EventStatus::Draft.accepts_registration());
        assert!(!EventStatus::Completed.accepts_registration());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(EventStatus::PendingApproval.as_str(), "pending_approval");
        assert_eq!(EventStatus::PendingApproval.to_string(), "pending_approval");
    }
}
