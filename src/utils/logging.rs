//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the GuestPass application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "guestpass.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log a successful redemption with structured data
pub fn log_redemption(code: &str, event_id: i64, participant_id: i64, ticket_number: &str) {
    info!(
        code = code,
        event_id = event_id,
        participant_id = participant_id,
        ticket_number = ticket_number,
        "Invitation redeemed"
    );
}

/// Log a rejected redemption attempt
pub fn log_rejection(code: &str, reason: &str) {
    warn!(code = code, reason = reason, "Redemption rejected");
}

/// Log an event workflow transition
pub fn log_transition(event_id: i64, from: &str, to: &str, actor_id: i64) {
    info!(
        event_id = event_id,
        from = from,
        to = to,
        actor_id = actor_id,
        "Event status transition applied"
    );
}
