//! Event sponsor model and quota pools

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One of the three per-sponsor seat pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaPool {
    Staff,
    Guest,
    Scholarship,
}

impl QuotaPool {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaPool::Staff => "staff",
            QuotaPool::Guest => "guest",
            QuotaPool::Scholarship => "scholarship",
        }
    }
}

impl std::fmt::Display for QuotaPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sponsor quota holder, one row per (event, company)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventSponsor {
    pub id: i64,
    pub event_id: i64,
    pub company_id: i64,
    pub staff_quota: i32,
    pub staff_used: i32,
    pub guest_quota: i32,
    pub guest_used: i32,
    pub scholarship_quota: i32,
    pub scholarship_used: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventSponsor {
    /// Allotted seats for a pool
    pub fn quota(&self, pool: QuotaPool) -> i32 {
        match pool {
            QuotaPool::Staff => self.staff_quota,
            QuotaPool::Guest => self.guest_quota,
            QuotaPool::Scholarship => self.scholarship_quota,
        }
    }

    /// Consumed seats for a pool
    pub fn used(&self, pool: QuotaPool) -> i32 {
        match pool {
            QuotaPool::Staff => self.staff_used,
            QuotaPool::Guest => self.guest_used,
            QuotaPool::Scholarship => self.scholarship_used,
        }
    }

    /// Seats still available in a pool
    pub fn remaining(&self, pool: QuotaPool) -> i32 {
        self.quota(pool) - self.used(pool)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSponsorRequest {
    pub event_id: i64,
    pub company_id: i64,
    pub staff_quota: i32,
    pub guest_quota: i32,
    pub scholarship_quota: i32,
}

/// Quota edit request; omitted pools keep their current value.
/// `used` counters are not reachable through this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuotaRequest {
    pub staff_quota: Option<i32>,
    pub guest_quota: Option<i32>,
    pub scholarship_quota: Option<i32>,
    pub is_active: Option<bool>,
}
