//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

/// Length of generated invitation codes
pub const INVITATION_CODE_LENGTH: usize = 12;

/// Generate an opaque, URL-safe invitation code
pub fn generate_invitation_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INVITATION_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Generate a human-readable ticket number, e.g. "GP-4F7A2C9B"
pub fn generate_ticket_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();
    format!("GP-{}", suffix)
}

/// Generate an opaque QR code payload for a ticket
pub fn generate_qr_payload() -> String {
    Uuid::new_v4().to_string()
}
