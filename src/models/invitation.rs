//! Invitation model, usage policies, and validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::sponsor::QuotaPool;

/// Category of participant an invitation admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participant_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    Staff,
    Guest,
    Scholarship,
    Regular,
    OperationalStaff,
}

impl ParticipantType {
    /// The sponsor quota pool this participant type draws from.
    ///
    /// `regular` and `operational_staff` consume invitation uses only,
    /// never sponsor quota.
    pub fn quota_pool(&self) -> Option<QuotaPool> {
        match self {
            ParticipantType::Staff => Some(QuotaPool::Staff),
            ParticipantType::Guest => Some(QuotaPool::Guest),
            ParticipantType::Scholarship => Some(QuotaPool::Scholarship),
            ParticipantType::Regular => None,
            ParticipantType::OperationalStaff => None,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ParticipantType::Staff => "Staff",
            ParticipantType::Guest => "Guest",
            ParticipantType::Scholarship => "Scholarship",
            ParticipantType::Regular => "Regular",
            ParticipantType::OperationalStaff => "Operational staff",
        }
    }
}

/// Policy governing how many times a code may be redeemed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "usage_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    Single,
    Multiple,
    Unlimited,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    pub id: i64,
    pub code: String,
    pub event_id: i64,
    /// None means organizer-issued, not sponsor-issued
    pub event_sponsor_id: Option<i64>,
    pub participant_type: ParticipantType,
    pub ticket_type_id: i64,
    pub usage_type: UsageType,
    /// Normalized at creation: single -> 1, multiple -> caller value, unlimited -> None
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Whether the invitation has expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Whether at least one use remains
    pub fn has_available_uses(&self) -> bool {
        match self.max_uses {
            None => true,
            Some(max) => self.current_uses < max,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitationRequest {
    pub participant_type: ParticipantType,
    pub ticket_type_id: i64,
    pub usage_type: UsageType,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Internal insert payload with usage rules already normalized by the registry
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub code: String,
    pub event_id: i64,
    pub event_sponsor_id: Option<i64>,
    pub participant_type: ParticipantType,
    pub ticket_type_id: i64,
    pub usage_type: UsageType,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Read-only validation snapshot for pre-flight display.
///
/// Advisory only: the actual mutation re-checks all of this atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub exists: bool,
    pub is_active: bool,
    pub is_expired: bool,
    pub has_available_uses: bool,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Report for a code that does not exist
    pub fn not_found() -> Self {
        Self {
            exists: false,
            is_active: false,
            is_expired: false,
            has_available_uses: false,
            valid: false,
            errors: vec!["not_found".to_string()],
        }
    }

    /// Compute the validation snapshot for an invitation as of `now`
    pub fn for_invitation(invitation: &Invitation, now: DateTime<Utc>) -> Self {
        let is_active = invitation.is_active;
        let is_expired = invitation.is_expired(now);
        let has_available_uses = invitation.has_available_uses();
        let valid = is_active && !is_expired && has_available_uses;

        let mut errors = Vec::new();
        if !is_active {
            errors.push("inactive".to_string());
        }
        if is_expired {
            errors.push("expired".to_string());
        }
        if !has_available_uses {
            errors.push("no_uses_left".to_string());
        }

        Self {
            exists: true,
            is_active,
            is_expired,
            has_available_uses,
            valid,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn invitation(usage_type: UsageType, max_uses: Option<i32>, current_uses: i32) -> Invitation {
        Invitation {
            id: 1,
            code: "ABC123".to_string(),
            event_id: 1,
            event_sponsor_id: Some(1),
            participant_type: ParticipantType::Guest,
            ticket_type_id: 1,
            usage_type,
            max_uses,
            current_uses,
            expires_at: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_quota_pool_mapping() {
        assert_eq!(ParticipantType::Staff.quota_pool(), Some(QuotaPool::Staff));
        assert_eq!(ParticipantType::Guest.quota_pool(), Some(QuotaPool::Guest));
        assert_eq!(
            ParticipantType::Scholarship.quota_pool(),
            Some(QuotaPool::Scholarship)
        );
        assert_eq!(ParticipantType::Regular.quota_pool(), None);
        assert_eq!(ParticipantType::OperationalStaff.quota_pool(), None);
    }

    #[test]
    fn test_single_use_availability() {
        let fresh = invitation(UsageType::Single, Some(1), 0);
        assert!(fresh.has_available_uses());

        let spent = invitation(UsageType::Single, Some(1), 1);
        assert!(!spent.has_available_uses());
    }

    #[test]
    fn test_unlimited_always_has_uses() {
        let inv = invitation(UsageType::Unlimited, None, 10_000);
        assert!(inv.has_available_uses());
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let mut inv = invitation(UsageType::Single, Some(1), 0);

        inv.expires_at = Some(now + Duration::hours(1));
        assert!(!inv.is_expired(now));

        inv.expires_at = Some(now - Duration::seconds(1));
        assert!(inv.is_expired(now));

        inv.expires_at = None;
        assert!(!inv.is_expired(now));
    }

    #[test]
    fn test_validation_report_collects_all_errors() {
        let now = Utc::now();
        let mut inv = invitation(UsageType::Multiple, Some(3), 3);
        inv.is_active = false;
        inv.expires_at = Some(now - Duration::hours(1));

        let report = ValidationReport::for_invitation(&inv, now);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["inactive", "expired", "no_uses_left"]
        );
    }

    #[test]
    fn test_validation_report_for_valid_invitation() {
        let inv = invitation(UsageType::Multiple, Some(10), 9);
        let report = ValidationReport::for_invitation(&inv, Utc::now());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    proptest! {
        /// valid is exactly the conjunction of the three component checks
        #[test]
        fn prop_valid_is_conjunction(
            current in 0i32..1000,
            max in 1i32..1000,
            active in any::<bool>(),
            expired_offset in -1000i64..1000,
        ) {
            let now = Utc::now();
            let mut inv = invitation(UsageType::Multiple, Some(max), current);
            inv.is_active = active;
            inv.expires_at = Some(now + Duration::seconds(expired_offset));

            let report = ValidationReport::for_invitation(&inv, now);
            prop_assert_eq!(
                report.valid,
                report.is_active && !report.is_expired && report.has_available_uses
            );
            prop_assert_eq!(report.has_available_uses, current < max);
            prop_assert_eq!(report.valid, report.errors.is_empty());
        }
    }
}
