//! Error handling for GuestPass
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

use crate::models::sponsor::QuotaPool;

/// Main error type for the GuestPass application
#[derive(Error, Debug)]
pub enum GuestPassError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invitation not found: {code}")]
    InvitationNotFound { code: String },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Sponsor not found: {sponsor_id}")]
    SponsorNotFound { sponsor_id: i64 },

    #[error("Invitation is not active")]
    InvitationInactive,

    #[error("Invitation has expired")]
    InvitationExpired,

    #[error("Invitation has no uses left")]
    NoUsesLeft,

    #[error("Sponsor quota exceeded for {pool} pool")]
    QuotaExceeded { pool: QuotaPool },

    #[error("Invitation was redeemed concurrently, no uses left")]
    ConcurrentRedemption,

    #[error("Illegal event transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Event {event_id} is not published, registration is closed")]
    EventNotPublished { event_id: i64 },

    #[error("Storage operation timed out")]
    StorageTimeout,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GuestPass operations
pub type Result<T> = std::result::Result<T, GuestPassError>;

impl GuestPassError {
    /// Stable machine-readable reason code surfaced to API clients
    pub fn reason_code(&self) -> &'static str {
        match self {
            GuestPassError::Database(_) => "storage_error",
            GuestPassError::Migration(_) => "storage_error",
            GuestPassError::Config(_) => "config_error",
            GuestPassError::PermissionDenied(_) => "permission_denied",
            GuestPassError::InvitationNotFound { .. } => "not_found",
            GuestPassError::EventNotFound { .. } => "not_found",
            GuestPassError::SponsorNotFound { .. } => "not_found",
            GuestPassError::InvitationInactive => "inactive",
            GuestPassError::InvitationExpired => "expired",
            GuestPassError::NoUsesLeft => "no_uses_left",
            GuestPassError::QuotaExceeded { .. } => "quota_exceeded",
            GuestPassError::ConcurrentRedemption => "concurrent_redemption",
            GuestPassError::IllegalTransition { .. } => "illegal_transition",
            GuestPassError::EventNotPublished { .. } => "event_not_published",
            GuestPassError::StorageTimeout => "storage_timeout",
            GuestPassError::InvalidInput(_) => "invalid_input",
            GuestPassError::Serialization(_) => "serialization_error",
            GuestPassError::Io(_) => "io_error",
        }
    }

    /// Check if the error is transient and worth a single retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GuestPassError::ConcurrentRedemption | GuestPassError::StorageTimeout
        )
    }

    /// Classify a sqlx error, separating pool acquire timeouts from hard failures.
    ///
    /// Timeouts must take the same rollback path as explicit failures, so the
    /// engine needs to tell them apart before deciding whether to retry.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => GuestPassError::StorageTimeout,
            other => GuestPassError::Database(other),
        }
    }
}

// Every `?` on a sqlx call goes through the same classification, so a pool
// acquire timeout can never surface as a plain Database error.
impl From<sqlx::Error> for GuestPassError {
    fn from(err: sqlx::Error) -> Self {
        GuestPassError::from_sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_stable() {
        assert_eq!(GuestPassError::NoUsesLeft.reason_code(), "no_uses_left");
        assert_eq!(
            GuestPassError::ConcurrentRedemption.reason_code(),
            "concurrent_redemption"
        );
        assert_eq!(
            GuestPassError::QuotaExceeded {
                pool: QuotaPool::Guest
            }
            .reason_code(),
            "quota_exceeded"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(GuestPassError::ConcurrentRedemption.is_transient());
        assert!(GuestPassError::StorageTimeout.is_transient());
        assert!(!GuestPassError::NoUsesLeft.is_transient());
        assert!(!GuestPassError::InvitationExpired.is_transient());
    }

    #[test]
    fn test_pool_timeout_maps_to_storage_timeout() {
        let err = GuestPassError::from_sqlx(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, GuestPassError::StorageTimeout));

        let err = GuestPassError::from_sqlx(sqlx::Error::RowNotFound);
        assert!(matches!(err, GuestPassError::Database(_)));
    }

    #[test]
    fn test_question_mark_conversion_classifies_pool_timeout() {
        // The `?` path must classify identically to from_sqlx, so the
        // retry logic sees StorageTimeout no matter which repository call
        // hit the timeout
        let err: GuestPassError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, GuestPassError::StorageTimeout));
        assert_eq!(err.reason_code(), "storage_timeout");

        let err: GuestPassError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.reason_code(), "storage_error");
    }
}
