//! Event sponsor repository implementation
//!
//! All quota counter mutations go through single conditional UPDATE
//! statements; there is no read-then-write path to any `used` column.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::sponsor::{CreateSponsorRequest, EventSponsor, QuotaPool, UpdateQuotaRequest};
use crate::utils::errors::GuestPassError;

const SPONSOR_COLUMNS: &str = "id, event_id, company_id, staff_quota, staff_used, \
     guest_quota, guest_used, scholarship_quota, scholarship_used, \
     is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SponsorRepository {
    pool: PgPool,
}

impl SponsorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new sponsor quota holder
    pub async fn create(
        &self,
        request: CreateSponsorRequest,
    ) -> Result<EventSponsor, GuestPassError> {
        let sponsor = sqlx::query_as::<_, EventSponsor>(&format!(
            r#"
            INSERT INTO event_sponsors
                (event_id, company_id, staff_quota, guest_quota, scholarship_quota, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SPONSOR_COLUMNS}
            "#
        ))
        .bind(request.event_id)
        .bind(request.company_id)
        .bind(request.staff_quota)
        .bind(request.guest_quota)
        .bind(request.scholarship_quota)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(sponsor)
    }

    /// Find sponsor by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<EventSponsor>, GuestPassError> {
        let sponsor = sqlx::query_as::<_, EventSponsor>(&format!(
            "SELECT {SPONSOR_COLUMNS} FROM event_sponsors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sponsor)
    }

    /// Atomically consume `n` seats from a pool.
    ///
    /// Returns `None` without side effect when the sponsor is missing,
    /// inactive, or the pool cannot fit `n` more seats. The guard and the
    /// increment are one statement, so the invariant `used <= quota` holds
    /// under any number of concurrent callers.
    pub async fn reserve(
        &self,
        id: i64,
        pool: QuotaPool,
        n: i32,
    ) -> Result<Option<EventSponsor>, GuestPassError> {
        let sql = match pool {
            QuotaPool::Staff => format!(
                r#"
                UPDATE event_sponsors
                SET staff_used = staff_used + $2, updated_at = NOW()
                WHERE id = $1 AND is_active = TRUE AND staff_used + $2 <= staff_quota
                RETURNING {SPONSOR_COLUMNS}
                "#
            ),
            QuotaPool::Guest => format!(
                r#"
                UPDATE event_sponsors
                SET guest_used = guest_used + $2, updated_at = NOW()
                WHERE id = $1 AND is_active = TRUE AND guest_used + $2 <= guest_quota
                RETURNING {SPONSOR_COLUMNS}
                "#
            ),
            QuotaPool::Scholarship => format!(
                r#"
                UPDATE event_sponsors
                SET scholarship_used = scholarship_used + $2, updated_at = NOW()
                WHERE id = $1 AND is_active = TRUE AND scholarship_used + $2 <= scholarship_quota
                RETURNING {SPONSOR_COLUMNS}
                "#
            ),
        };

        let sponsor = sqlx::query_as::<_, EventSponsor>(&sql)
            .bind(id)
            .bind(n)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sponsor)
    }

    /// Reverse an uncommitted reservation of `n` seats.
    ///
    /// Guarded so `used` can never drop below zero even if a rollback is
    /// attempted twice.
    pub async fn release(
        &self,
        id: i64,
        pool: QuotaPool,
        n: i32,
    ) -> Result<Option<EventSponsor>, GuestPassError> {
        let sql = match pool {
            QuotaPool::Staff => format!(
                r#"
                UPDATE event_sponsors
                SET staff_used = staff_used - $2, updated_at = NOW()
                WHERE id = $1 AND staff_used >= $2
                RETURNING {SPONSOR_COLUMNS}
                "#
            ),
            QuotaPool::Guest => format!(
                r#"
                UPDATE event_sponsors
                SET guest_used = guest_used - $2, updated_at = NOW()
                WHERE id = $1 AND guest_used >= $2
                RETURNING {SPONSOR_COLUMNS}
                "#
            ),
            QuotaPool::Scholarship => format!(
                r#"
                UPDATE event_sponsors
                SET scholarship_used = scholarship_used - $2, updated_at = NOW()
                WHERE id = $1 AND scholarship_used >= $2
                RETURNING {SPONSOR_COLUMNS}
                "#
            ),
        };

        let sponsor = sqlx::query_as::<_, EventSponsor>(&sql)
            .bind(id)
            .bind(n)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sponsor)
    }

    /// Apply an admin quota edit.
    ///
    /// The WHERE clause rejects any edit that would set a quota below the
    /// pool's current `used` count; `None` means the guard failed (or the
    /// sponsor does not exist) and nothing changed.
    pub async fn update_quotas(
        &self,
        id: i64,
        request: UpdateQuotaRequest,
    ) -> Result<Option<EventSponsor>, GuestPassError> {
        let sponsor = sqlx::query_as::<_, EventSponsor>(&format!(
            r#"
            UPDATE event_sponsors
            SET staff_quota = COALESCE($2, staff_quota),
                guest_quota = COALESCE($3, guest_quota),
                scholarship_quota = COALESCE($4, scholarship_quota),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $1
              AND staff_used <= COALESCE($2, staff_quota)
              AND guest_used <= COALESCE($3, guest_quota)
              AND scholarship_used <= COALESCE($4, scholarship_quota)
            RETURNING {SPONSOR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.staff_quota)
        .bind(request.guest_quota)
        .bind(request.scholarship_quota)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(sponsor)
    }
}
