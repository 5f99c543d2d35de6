//! Error to HTTP response mapping
//!
//! Bridges the domain error taxonomy into JSON responses with stable
//! machine-readable reason codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::utils::errors::GuestPassError;

/// JSON body for every rejected request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    /// Stable machine-readable reason code
    pub reason: &'static str,
    /// Human-readable message
    pub message: String,
}

/// Wrapper so domain errors can be returned from handlers with `?`
#[derive(Debug)]
pub struct ApiError(pub GuestPassError);

impl From<GuestPassError> for ApiError {
    fn from(err: GuestPassError) -> Self {
        Self(err)
    }
}

fn status_for(err: &GuestPassError) -> StatusCode {
    match err {
        GuestPassError::InvitationNotFound { .. }
        | GuestPassError::EventNotFound { .. }
        | GuestPassError::SponsorNotFound { .. } => StatusCode::NOT_FOUND,

        GuestPassError::InvitationInactive
        | GuestPassError::InvitationExpired
        | GuestPassError::NoUsesLeft
        | GuestPassError::QuotaExceeded { .. }
        | GuestPassError::ConcurrentRedemption
        | GuestPassError::IllegalTransition { .. }
        | GuestPassError::EventNotPublished { .. } => StatusCode::CONFLICT,

        GuestPassError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        GuestPassError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GuestPassError::StorageTimeout => StatusCode::SERVICE_UNAVAILABLE,

        GuestPassError::Database(_)
        | GuestPassError::Migration(_)
        | GuestPassError::Config(_)
        | GuestPassError::Serialization(_)
        | GuestPassError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        // Internal details stay in the logs
        let message = if status.is_server_error() {
            "An internal error occurred".to_string()
        } else {
            self.0.to_string()
        };

        let body = ErrorBody {
            success: false,
            reason: self.0.reason_code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
