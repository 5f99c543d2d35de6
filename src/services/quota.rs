//! Quota ledger service
//!
//! Holds the per-sponsor seat pools and hands out reservations. The ledger
//! is reserve-then-confirm: a successful reserve has already durably
//! incremented the pool counter, which closes the check-then-act race
//! window. A reservation that is not committed must be released.

use tracing::{debug, warn};

use crate::database::SponsorRepository;
use crate::models::sponsor::{EventSponsor, QuotaPool, UpdateQuotaRequest};
use crate::utils::errors::{GuestPassError, Result};

/// Handle for a durably reserved slice of a sponsor pool.
///
/// Dropping the handle without `commit` or `release` leaks reserved seats;
/// the redemption engine releases on every failure path.
#[derive(Debug, Clone)]
#[must_use = "a reservation must be committed or released"]
pub struct QuotaReservation {
    pub sponsor_id: i64,
    pub pool: QuotaPool,
    pub seats: i32,
}

/// Quota ledger over the sponsor repository
#[derive(Debug, Clone)]
pub struct QuotaService {
    sponsors: SponsorRepository,
}

impl QuotaService {
    pub fn new(sponsors: SponsorRepository) -> Self {
        Self { sponsors }
    }

    /// Reserve `seats` from a sponsor pool.
    ///
    /// On success the pool counter is already incremented and durable. On
    /// `QuotaExceeded` nothing changed. Never lets `used` exceed `quota`
    /// regardless of concurrent callers.
    pub async fn reserve(
        &self,
        sponsor_id: i64,
        pool: QuotaPool,
        seats: i32,
    ) -> Result<QuotaReservation> {
        if seats <= 0 {
            return Err(GuestPassError::InvalidInput(
                "Reservation must be for at least one seat".to_string(),
            ));
        }

        match self.sponsors.reserve(sponsor_id, pool, seats).await? {
            Some(sponsor) => {
                debug!(
                    sponsor_id = sponsor_id,
                    pool = %pool,
                    seats = seats,
                    used = sponsor.used(pool),
                    quota = sponsor.quota(pool),
                    "Quota reserved"
                );
                Ok(QuotaReservation {
                    sponsor_id,
                    pool,
                    seats,
                })
            }
            // The guarded update matched no row: find out why
            None => match self.sponsors.find_by_id(sponsor_id).await? {
                None => Err(GuestPassError::SponsorNotFound { sponsor_id }),
                Some(sponsor) if !sponsor.is_active => Err(GuestPassError::PermissionDenied(
                    "Sponsor is not active".to_string(),
                )),
                Some(_) => Err(GuestPassError::QuotaExceeded { pool }),
            },
        }
    }

    /// Reverse an uncommitted reservation.
    ///
    /// Called synchronously on every failure path after a successful
    /// reserve; there is no deferred cleanup job this correctness relies on.
    pub async fn release(&self, reservation: QuotaReservation) -> Result<()> {
        let released = self
            .sponsors
            .release(reservation.sponsor_id, reservation.pool, reservation.seats)
            .await?;

        if released.is_none() {
            // Guard refused the decrement: the counter was already at zero,
            // which means this reservation was released twice
            warn!(
                sponsor_id = reservation.sponsor_id,
                pool = %reservation.pool,
                "Release found nothing to reverse"
            );
        } else {
            debug!(
                sponsor_id = reservation.sponsor_id,
                pool = %reservation.pool,
                seats = reservation.seats,
                "Quota reservation released"
            );
        }

        Ok(())
    }

    /// Confirm a reservation, consuming the handle.
    ///
    /// The increment already happened at reserve time, so commit has no
    /// storage side effect.
    pub fn commit(&self, reservation: QuotaReservation) {
        debug!(
            sponsor_id = reservation.sponsor_id,
            pool = %reservation.pool,
            seats = reservation.seats,
            "Quota reservation committed"
        );
    }

    /// Current sponsor state, for quota displays and admin edits
    pub async fn get_sponsor(&self, sponsor_id: i64) -> Result<EventSponsor> {
        self.sponsors
            .find_by_id(sponsor_id)
            .await?
            .ok_or(GuestPassError::SponsorNotFound { sponsor_id })
    }

    /// Apply an admin quota edit.
    ///
    /// Rejects any edit that would set a pool quota below its current
    /// consumed count; the check and the write are one guarded statement.
    pub async fn update_quotas(
        &self,
        sponsor_id: i64,
        request: UpdateQuotaRequest,
    ) -> Result<EventSponsor> {
        match self.sponsors.update_quotas(sponsor_id, request).await? {
            Some(sponsor) => Ok(sponsor),
            None => match self.sponsors.find_by_id(sponsor_id).await? {
                None => Err(GuestPassError::SponsorNotFound { sponsor_id }),
                Some(_) => Err(GuestPassError::InvalidInput(
                    "Quota cannot be set below the consumed count".to_string(),
                )),
            },
        }
    }
}
