//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod invitation;
pub mod participant;
pub mod sponsor;

// Re-export commonly used models
pub use event::{Actor, ActorRole, CreateEventRequest, Event, EventStatus, TicketType};
pub use invitation::{
    CreateInvitationRequest, Invitation, NewInvitation, ParticipantType, UsageType,
    ValidationReport,
};
pub use participant::{
    InvitationUse, NewParticipant, Participant, RedeemRequest, RedeemUserData, Ticket,
};
pub use sponsor::{CreateSponsorRequest, EventSponsor, QuotaPool, UpdateQuotaRequest};
