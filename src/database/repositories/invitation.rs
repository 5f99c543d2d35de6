//! Invitation repository implementation
//!
//! The use counter is only ever mutated through `mark_used` and
//! `unmark_used`, both single conditional UPDATE statements.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::invitation::{Invitation, NewInvitation};
use crate::utils::errors::GuestPassError;

const INVITATION_COLUMNS: &str = "id, code, event_id, event_sponsor_id, participant_type, \
     ticket_type_id, usage_type, max_uses, current_uses, expires_at, \
     is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new invitation
    pub async fn create(&self, invitation: NewInvitation) -> Result<Invitation, GuestPassError> {
        let created = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            INSERT INTO invitations
                (code, event_id, event_sponsor_id, participant_type, ticket_type_id,
                 usage_type, max_uses, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(invitation.code)
        .bind(invitation.event_id)
        .bind(invitation.event_sponsor_id)
        .bind(invitation.participant_type)
        .bind(invitation.ticket_type_id)
        .bind(invitation.usage_type)
        .bind(invitation.max_uses)
        .bind(invitation.expires_at)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find invitation by code
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>, GuestPassError> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    /// Find invitation by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Invitation>, GuestPassError> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    /// Atomically consume one use of an invitation.
    ///
    /// Re-checks active, expiry, and remaining uses in the same statement
    /// that increments the counter. `None` means the guard failed and the
    /// counter did not move; the caller classifies why from a fresh read.
    pub async fn mark_used(&self, code: &str) -> Result<Option<Invitation>, GuestPassError> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            UPDATE invitations
            SET current_uses = current_uses + 1, updated_at = NOW()
            WHERE code = $1
              AND is_active = TRUE
              AND (expires_at IS NULL OR expires_at > NOW())
              AND (max_uses IS NULL OR current_uses < max_uses)
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    /// Reverse an increment whose redemption never committed.
    ///
    /// Only the redemption engine calls this, on its rollback path. The
    /// guard keeps the counter from going negative on a duplicate rollback.
    pub async fn unmark_used(&self, id: i64) -> Result<(), GuestPassError> {
        sqlx::query(
            r#"
            UPDATE invitations
            SET current_uses = current_uses - 1, updated_at = NOW()
            WHERE id = $1 AND current_uses > 0
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Toggle the manual kill switch. This is the only mutation exposed to
    /// the PATCH endpoint; `current_uses` is unreachable from here.
    pub async fn set_active(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<Invitation>, GuestPassError> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            UPDATE invitations
            SET is_active = $2, updated_at = $3
            WHERE id = $1
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }
}
