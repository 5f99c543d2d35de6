//! Services module
//!
//! This module contains business logic services

pub mod invitation;
pub mod quota;
pub mod redemption;
pub mod workflow;

// Re-export commonly used services
pub use invitation::InvitationService;
pub use quota::{QuotaReservation, QuotaService};
pub use redemption::{RedemptionOutcome, RedemptionService};
pub use workflow::WorkflowService;

use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub quota_service: QuotaService,
    pub invitation_service: InvitationService,
    pub workflow_service: WorkflowService,
    pub redemption_service: RedemptionService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService) -> Self {
        let quota_service = QuotaService::new(database.sponsors.clone());
        let invitation_service = InvitationService::new(
            database.invitations.clone(),
            database.events.clone(),
            database.sponsors.clone(),
        );
        let workflow_service = WorkflowService::new(database.events.clone());
        let redemption_service = RedemptionService::new(
            database.events.clone(),
            database.participants.clone(),
            invitation_service.clone(),
            quota_service.clone(),
        );

        Self {
            quota_service,
            invitation_service,
            workflow_service,
            redemption_service,
        }
    }
}
