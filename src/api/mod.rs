//! HTTP API module
//!
//! axum router and handlers exposing the redemption core to the external
//! UI layer.

pub mod error;
pub mod events;
pub mod extractors;
pub mod invitations;
pub mod sponsors;

use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::database::{DatabasePool, DatabaseService};
use crate::services::ServiceFactory;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub database: DatabaseService,
    pub services: ServiceFactory,
    pub pool: DatabasePool,
}

impl AppState {
    pub fn new(pool: DatabasePool) -> Self {
        let database = DatabaseService::new(pool.clone());
        let services = ServiceFactory::new(database.clone());
        Self {
            database,
            services,
            pool,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/invitations/:code/validate",
            get(invitations::validate_invitation),
        )
        .route(
            "/invitations/:code/accept",
            post(invitations::accept_invitation),
        )
        .route(
            "/events/:event_id/sponsors/:sponsor_id/invitations",
            post(sponsors::create_invitation),
        )
        .route(
            "/events/:event_id/sponsors/:sponsor_id/invitations/:id",
            patch(sponsors::toggle_invitation),
        )
        .route(
            "/events/:event_id/sponsors/:sponsor_id",
            patch(sponsors::update_sponsor),
        )
        .route("/events/:id/status", patch(events::transition_event))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    crate::database::health_check(&state.pool).await?;
    Ok((StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))))
}
