//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, EventStatus, TicketType};
use crate::utils::errors::GuestPassError;

const EVENT_COLUMNS: &str =
    "id, title, description, event_status, rejection_reason, created_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event in `draft` status
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, GuestPassError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.created_by)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, GuestPassError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Apply a status change, leaving the rejection reason untouched.
    ///
    /// The guard on the previous status makes the transition atomic: if a
    /// concurrent caller already moved the event, zero rows match and the
    /// workflow re-reads instead of overwriting.
    pub async fn update_status(
        &self,
        id: i64,
        from: EventStatus,
        to: EventStatus,
    ) -> Result<Option<Event>, GuestPassError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET event_status = $3, updated_at = $4
            WHERE id = $1 AND event_status = $2
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Apply a status change and overwrite the rejection reason.
    ///
    /// Used when entering `rejected` (reason recorded) and when resubmitting
    /// `rejected -> draft` (reason cleared).
    pub async fn update_status_with_reason(
        &self,
        id: i64,
        from: EventStatus,
        to: EventStatus,
        rejection_reason: Option<String>,
    ) -> Result<Option<Event>, GuestPassError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET event_status = $3, rejection_reason = $4, updated_at = $5
            WHERE id = $1 AND event_status = $2
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(rejection_reason)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Create a ticket type for an event
    pub async fn create_ticket_type(
        &self,
        event_id: i64,
        name: &str,
    ) -> Result<TicketType, GuestPassError> {
        let ticket_type = sqlx::query_as::<_, TicketType>(
            r#"
            INSERT INTO ticket_types (event_id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, name, created_at
            "#,
        )
        .bind(event_id)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket_type)
    }

    /// Find ticket type by ID
    pub async fn find_ticket_type(&self, id: i64) -> Result<Option<TicketType>, GuestPassError> {
        let ticket_type = sqlx::query_as::<_, TicketType>(
            "SELECT id, event_id, name, created_at FROM ticket_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket_type)
    }
}
