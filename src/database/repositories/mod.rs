//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod event;
pub mod invitation;
pub mod participant;
pub mod sponsor;

// Re-export repositories
pub use event::EventRepository;
pub use invitation::InvitationRepository;
pub use participant::ParticipantRepository;
pub use sponsor::SponsorRepository;
