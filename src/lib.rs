//! GuestPass invitation redemption service
//!
//! The transactional core of an event-invitation platform: sponsor quota
//! allocation, invitation-code redemption, and the event approval workflow,
//! exposed over HTTP to the surrounding registration UI.

#![allow(non_snake_case)]

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GuestPassError, Result};

// Re-export main components for easy access
pub use api::AppState;
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
