//! Participant and ticket repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::participant::{NewParticipant, Participant, Ticket};
use crate::utils::errors::GuestPassError;

#[derive(Debug, Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

/// Surface the per-invitation email dedupe as a business-rule rejection
/// instead of a bare storage error
fn map_participant_error(err: sqlx::Error) -> GuestPassError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.constraint() == Some("uq_participants_invitation_email") {
            return GuestPassError::InvalidInput(
                "This email is already registered for this invitation".to_string(),
            );
        }
    }
    GuestPassError::from_sqlx(err)
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Commit step of a redemption: insert the participant, the ticket, and
    /// the append-only use-log row in one transaction.
    ///
    /// Either all three rows exist afterwards or none do; a failure here is
    /// what triggers the engine's quota and use-count rollback.
    pub async fn create_redeemed(
        &self,
        participant: NewParticipant,
        ticket_type_id: i64,
        ticket_number: &str,
        qr_code: &str,
    ) -> Result<(Participant, Ticket), GuestPassError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants
                (event_id, invitation_id, participant_type, first_name, last_name,
                 email, phone, redeemer_user_id, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, event_id, invitation_id, participant_type, first_name,
                      last_name, email, phone, redeemer_user_id, registered_at
            "#,
        )
        .bind(participant.event_id)
        .bind(participant.invitation_id)
        .bind(participant.participant_type)
        .bind(&participant.first_name)
        .bind(&participant.last_name)
        .bind(&participant.email)
        .bind(&participant.phone)
        .bind(participant.redeemer_user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_participant_error)?;

        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets
                (ticket_number, qr_code, event_id, ticket_type_id, participant_id,
                 invitation_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, ticket_number, qr_code, event_id, ticket_type_id,
                      participant_id, invitation_id, created_at
            "#,
        )
        .bind(ticket_number)
        .bind(qr_code)
        .bind(created.event_id)
        .bind(ticket_type_id)
        .bind(created.id)
        .bind(created.invitation_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO invitation_uses (invitation_id, participant_id, redeemer_user_id, used_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(created.invitation_id)
        .bind(created.id)
        .bind(created.redeemer_user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((created, ticket))
    }

    /// Count use-log rows for an invitation.
    ///
    /// The log is the authoritative history; this derived count can be
    /// compared against `current_uses` as a consistency check.
    pub async fn count_uses(&self, invitation_id: i64) -> Result<i64, GuestPassError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM invitation_uses WHERE invitation_id = $1")
                .bind(invitation_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Count participants registered for an event
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, GuestPassError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM participants WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
