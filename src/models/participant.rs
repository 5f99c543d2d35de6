//! Participant, ticket, and invitation-use models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::invitation::ParticipantType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: i64,
    pub event_id: i64,
    pub invitation_id: i64,
    pub participant_type: ParticipantType,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub redeemer_user_id: Option<i64>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub ticket_number: String,
    pub qr_code: Option<String>,
    pub event_id: i64,
    pub ticket_type_id: i64,
    pub participant_id: i64,
    pub invitation_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Append-only record of a successful redemption
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvitationUse {
    pub id: i64,
    pub invitation_id: i64,
    pub participant_id: i64,
    pub redeemer_user_id: Option<i64>,
    pub used_at: DateTime<Utc>,
}

/// Contact details supplied when redeeming without an existing account.
/// The password is handed off to the external auth service, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemUserData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub phone: Option<String>,
}

/// Redemption request as received from the registration UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub accept_with_auth: bool,
    pub user_data: Option<RedeemUserData>,
}

/// Internal insert payload for the commit step of a redemption
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub event_id: i64,
    pub invitation_id: i64,
    pub participant_type: ParticipantType,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub redeemer_user_id: Option<i64>,
}
