//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    DatabasePool, EventRepository, InvitationRepository, ParticipantRepository, SponsorRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub sponsors: SponsorRepository,
    pub invitations: InvitationRepository,
    pub participants: ParticipantRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            sponsors: SponsorRepository::new(pool.clone()),
            invitations: InvitationRepository::new(pool.clone()),
            participants: ParticipantRepository::new(pool),
        }
    }
}
