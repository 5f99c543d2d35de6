//! Test data helpers for creating fixture rows
//!
//! Builders go through the repositories where the production write path
//! exists; status shortcuts that the workflow would forbid use raw SQL.

use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use sqlx::PgPool;

use GuestPass::database::DatabaseService;
use GuestPass::models::event::{CreateEventRequest, Event, EventStatus, TicketType};
use GuestPass::models::invitation::{Invitation, NewInvitation, ParticipantType, UsageType};
use GuestPass::models::participant::{RedeemRequest, RedeemUserData};
use GuestPass::models::sponsor::{CreateSponsorRequest, EventSponsor};

/// Create an event and force it into the given status
pub async fn create_event(pool: &PgPool, database: &DatabaseService, status: EventStatus) -> Event {
    let event = database
        .events
        .create(CreateEventRequest {
            title: "Test Event".to_string(),
            description: Some("Integration test event".to_string()),
            created_by: Some(1),
        })
        .await
        .expect("Failed to create test event");

    if status == EventStatus::Draft {
        event
    } else {
        set_event_status(pool, event.id, status).await
    }
}

/// Force an event into a status, bypassing the workflow guards.
/// Only for arranging test preconditions.
pub async fn set_event_status(pool: &PgPool, event_id: i64, status: EventStatus) -> Event {
    sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET event_status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, title, description, event_status, rejection_reason,
                  created_by, created_at, updated_at
        "#,
    )
    .bind(event_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("Failed to set event status")
}

/// Create a ticket type for an event
pub async fn create_ticket_type(database: &DatabaseService, event_id: i64) -> TicketType {
    database
        .events
        .create_ticket_type(event_id, "General admission")
        .await
        .expect("Failed to create test ticket type")
}

/// Create a sponsor with the given pool quotas
pub async fn create_sponsor(
    database: &DatabaseService,
    event_id: i64,
    staff_quota: i32,
    guest_quota: i32,
    scholarship_quota: i32,
) -> EventSponsor {
    database
        .sponsors
        .create(CreateSponsorRequest {
            event_id,
            company_id: 7,
            staff_quota,
            guest_quota,
            scholarship_quota,
        })
        .await
        .expect("Failed to create test sponsor")
}

/// Create an invitation with an explicit code, bypassing the registry's
/// code generator so tests can redeem by a known code
#[allow(clippy::too_many_arguments)]
pub async fn create_invitation(
    database: &DatabaseService,
    code: &str,
    event_id: i64,
    event_sponsor_id: Option<i64>,
    ticket_type_id: i64,
    participant_type: ParticipantType,
    usage_type: UsageType,
    max_uses: Option<i32>,
    expires_at: Option<DateTime<Utc>>,
) -> Invitation {
    database
        .invitations
        .create(NewInvitation {
            code: code.to_string(),
            event_id,
            event_sponsor_id,
            participant_type,
            ticket_type_id,
            usage_type,
            max_uses,
            expires_at,
        })
        .await
        .expect("Failed to create test invitation")
}

/// Redemption request with generated contact details
pub fn redeem_request() -> RedeemRequest {
    redeem_request_for_email(&SafeEmail().fake::<String>())
}

/// Redemption request for a specific email address
pub fn redeem_request_for_email(email: &str) -> RedeemRequest {
    RedeemRequest {
        accept_with_auth: false,
        user_data: Some(RedeemUserData {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: email.to_string(),
            password: None,
            phone: None,
        }),
    }
}
